//! Generic HTTP-based completion provider for OpenAI-compatible APIs.
//!
//! Talks to `{api_base}/chat/completions` for replies and `{api_base}/models`
//! for model discovery. Covers the local interference bridge as well as
//! OpenRouter, OpenAI, DeepSeek, Groq and Gemini.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use chatrelay_core::types::Message;

use crate::error::ProviderError;
use crate::registry::{resolve_model_name, ProviderConfig, ProviderSpec};
use crate::reply::ReplyShape;
use crate::traits::LlmProvider;

/// Overall deadline for a single upstream request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: String,
    messages: &'a [Message],
    stream: bool,
}

/// `GET /models` response body.
#[derive(Debug, Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// A completion provider that talks to any OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication. Empty for key-less bridges.
    api_key: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Reference to the provider spec for model matching and resolution.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider from a provider config and spec.
    ///
    /// The API base comes from the config if set, else the spec default.
    pub fn new(config: &ProviderConfig, spec: &'static ProviderSpec) -> Result<Self, ProviderError> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let mut extra_headers = HeaderMap::new();
        if let Some(ref headers) = config.extra_headers {
            for (key, value) in headers {
                if let (Ok(name), Ok(val)) = (
                    HeaderName::from_bytes(key.as_bytes()),
                    HeaderValue::from_str(value),
                ) {
                    extra_headers.insert(name, val);
                } else {
                    warn!(provider = spec.display_name, "Invalid header: {}={}", key, value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::transport(spec.display_name, e))?;

        Ok(HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            extra_headers,
            spec,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Attach auth and extra headers.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.headers(self.extra_headers.clone());
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.api_key)
        }
    }

    /// Send a request and return the body of a successful response.
    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<String, ProviderError> {
        let provider = self.spec.display_name;

        let response = self.authorize(request).send().await.map_err(|e| {
            error!(provider, error = %e, "HTTP request failed");
            ProviderError::transport(provider, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(provider, status = %status, body = %body, "API error");
            return Err(ProviderError::Status {
                provider: provider.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::decode(provider, e))
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(&self, messages: &[Message], model: &str) -> Result<ReplyShape, ProviderError> {
        let resolved_model = resolve_model_name(model, self.spec);

        debug!(
            provider = self.spec.display_name,
            model = %resolved_model,
            messages = messages.len(),
            "Calling provider"
        );

        let body = ChatCompletionRequest {
            model: resolved_model,
            messages,
            stream: false,
        };

        let raw = self
            .fetch(self.client.post(self.endpoint("chat/completions")).json(&body))
            .await?;

        let reply = ReplyShape::decode(&raw);
        debug!(provider = self.spec.display_name, shape = reply.kind(), "Reply received");
        Ok(reply)
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let raw = self.fetch(self.client.get(self.endpoint("models"))).await?;
        let list: ModelList = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::decode(self.spec.display_name, e))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    fn supports_model(&self, model: &str) -> bool {
        self.spec.matches_model(model)
    }

    fn is_fallback(&self) -> bool {
        self.spec.is_fallback()
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            ..Default::default()
        }
    }

    fn make_provider(name: &str, api_key: &str, api_base: Option<&str>) -> HttpProvider {
        let spec = find_by_name(name).unwrap();
        HttpProvider::new(&make_config(api_key, api_base), spec).unwrap()
    }

    // ── Unit tests ──

    #[test]
    fn test_endpoint_trailing_slash() {
        let provider = make_provider("openai", "key", Some("https://api.openai.com/v1/"));
        assert_eq!(
            provider.endpoint("chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base() {
        let provider = make_provider("interference", "", None);
        assert_eq!(provider.api_base, "http://localhost:1337/v1");
        assert!(provider.is_fallback());
    }

    #[test]
    fn test_config_overrides_default_base() {
        let provider = make_provider("openrouter", "sk-or-abc", Some("https://custom.proxy.com/v1"));
        assert_eq!(provider.api_base, "https://custom.proxy.com/v1");
    }

    #[test]
    fn test_supports_model_by_keyword() {
        let provider = make_provider("openai", "key", None);
        assert!(provider.supports_model("gpt-3.5-turbo"));
        assert!(!provider.supports_model("gemini-pro"));
    }

    #[test]
    fn test_extra_headers() {
        let spec = find_by_name("openrouter").unwrap();
        let mut headers = HashMap::new();
        headers.insert("HTTP-Referer".to_string(), "https://example.com".to_string());
        let config = ProviderConfig {
            api_key: "key".to_string(),
            extra_headers: Some(headers),
            ..Default::default()
        };
        let provider = HttpProvider::new(&config, spec).unwrap();
        assert!(provider.extra_headers.contains_key("http-referer"));
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_chat_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-test",
                "choices": [{
                    "message": { "role": "assistant", "content": "Hello from the mock." },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = make_provider("openai", "test-key-123", Some(&mock_server.uri()));
        let messages = vec![Message::system("Be nice."), Message::user("Hello")];

        let reply = provider.chat(&messages, "gpt-4").await.unwrap();
        assert_eq!(reply, ReplyShape::ChoiceWrapped("Hello from the mock.".to_string()));
    }

    #[tokio::test]
    async fn test_chat_sends_resolved_model_and_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "deepseek-chat",
                "stream": false,
                "messages": [{ "role": "user", "content": "test" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain ok"))
            .mount(&mock_server)
            .await;

        let provider = make_provider("deepseek", "ds-key", Some(&mock_server.uri()));
        let reply = provider
            .chat(&[Message::user("test")], "deepseek/deepseek-chat")
            .await
            .unwrap();

        // If the body matcher fails, wiremock returns 404 → we'd get an error
        assert_eq!(reply, ReplyShape::PlainText("plain ok".to_string()));
    }

    #[tokio::test]
    async fn test_chat_without_key_sends_no_auth_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "from the bridge"
            })))
            .mount(&mock_server)
            .await;

        let provider = make_provider("interference", "", Some(&mock_server.uri()));
        let reply = provider.chat(&[Message::user("hi")], "gpt-4").await.unwrap();
        assert_eq!(reply, ReplyShape::ReplyWrapped("from the bridge".to_string()));

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_chat_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
            .mount(&mock_server)
            .await;

        let provider = make_provider("openai", "key", Some(&mock_server.uri()));
        let err = provider.chat(&[Message::user("Hello")], "gpt-4").await.unwrap_err();

        assert_eq!(
            err,
            ProviderError::Status {
                provider: "OpenAI".to_string(),
                status: 429,
                body: "Rate limit exceeded".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_chat_network_error() {
        // Point to a port that's not listening
        let provider = make_provider("openai", "key", Some("http://127.0.0.1:1"));
        let err = provider.chat(&[Message::user("Hello")], "gpt-4").await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [
                    { "id": "gpt-4", "object": "model" },
                    { "id": "gpt-4o-mini", "object": "model" }
                ]
            })))
            .mount(&mock_server)
            .await;

        let provider = make_provider("interference", "", Some(&mock_server.uri()));
        let models = provider.list_models().await.unwrap();
        assert_eq!(models, vec!["gpt-4", "gpt-4o-mini"]);
    }

    #[tokio::test]
    async fn test_list_models_bad_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&mock_server)
            .await;

        let provider = make_provider("groq", "key", Some(&mock_server.uri()));
        let err = provider.list_models().await.unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }
}
