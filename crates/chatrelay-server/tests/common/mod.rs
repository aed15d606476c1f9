//! Shared fixtures for the router tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use chatrelay_core::types::Message;
use chatrelay_providers::{LlmProvider, ProviderError, ProviderHub, ReplyShape};

/// A catch-all provider with canned answers that records every chat call.
pub struct Scripted {
    reply: Result<ReplyShape, ProviderError>,
    models: Result<Vec<String>, ProviderError>,
    pub calls: Mutex<Vec<(String, Vec<Message>)>>,
}

impl Scripted {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Scripted {
            reply: Ok(ReplyShape::ChoiceWrapped(text.to_string())),
            models: Ok(vec!["gpt-4".to_string(), "gpt-3.5-turbo".to_string()]),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Scripted {
            reply: Err(ProviderError::transport("scripted", message)),
            models: Err(ProviderError::transport("scripted", message)),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_models(text: &str, models: &[&str]) -> Arc<Self> {
        Arc::new(Scripted {
            reply: Ok(ReplyShape::PlainText(text.to_string())),
            models: Ok(models.iter().map(|m| m.to_string()).collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn last_call(&self) -> (String, Vec<Message>) {
        self.calls.lock().unwrap().last().cloned().expect("no chat call recorded")
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for Scripted {
    async fn chat(&self, messages: &[Message], model: &str) -> Result<ReplyShape, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), messages.to_vec()));
        self.reply.clone()
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        self.models.clone()
    }

    fn supports_model(&self, _model: &str) -> bool {
        false
    }

    fn is_fallback(&self) -> bool {
        true
    }

    fn display_name(&self) -> &str {
        "scripted"
    }
}

pub fn hub_of(providers: Vec<Arc<Scripted>>) -> Arc<ProviderHub> {
    Arc::new(ProviderHub::new(
        providers
            .into_iter()
            .map(|p| p as Arc<dyn LlmProvider>)
            .collect(),
    ))
}

/// Send a request and decode the JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Send a CORS preflight for `method uri` from a foreign origin.
pub async fn preflight(app: &Router, uri: &str, method: Method) -> Response<Body> {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, method.as_str())
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// `Access-Control-Allow-Origin` of a response, if any.
pub fn allow_origin(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(&body.to_string())).await
}
