//! Provider registry — static specs for every supported completion backend.
//!
//! Each `ProviderSpec` describes how to reach a provider: keywords for model
//! matching, API bases, and whether it is a catch-all gateway.

use std::collections::HashMap;

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Static specification describing one completion provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name (e.g. `"openrouter"`), also the config key.
    pub name: &'static str,
    /// Keywords to match in model names (lowercase). E.g. `&["gpt", "openai"]`.
    pub keywords: &'static [&'static str],
    /// Human-readable name for logs. E.g. `"OpenRouter"`.
    pub display_name: &'static str,
    /// Namespace prefixes removed before the model name is sent upstream.
    /// E.g. `&["deepseek/"]` turns `"deepseek/deepseek-chat"` into `"deepseek-chat"`.
    pub strip_prefixes: &'static [&'static str],
    /// Whether this is a gateway/aggregator that accepts any model.
    /// Gateways are used as fallback when no direct match is found.
    pub is_gateway: bool,
    /// Whether this is a local, key-less bridge.
    pub is_local: bool,
    /// Default API base URL.
    pub default_api_base: &'static str,
}

impl ProviderSpec {
    /// Gateways and local bridges catch models nobody else claims.
    pub fn is_fallback(&self) -> bool {
        self.is_gateway || self.is_local
    }

    /// Keyword match against a model name. Fallback providers never match directly.
    pub fn matches_model(&self, model: &str) -> bool {
        if self.is_fallback() {
            return false;
        }
        let model_lower = model.to_lowercase();
        self.keywords.iter().any(|kw| model_lower.contains(kw))
    }
}

// ─────────────────────────────────────────────
// All providers (in priority order)
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications, in matching priority order.
pub static PROVIDERS: &[ProviderSpec] = &[
    // 1. Local free-tier bridge exposing an OpenAI-compatible API, no key required
    ProviderSpec {
        name: "interference",
        keywords: &[],
        display_name: "Interference",
        strip_prefixes: &[],
        is_gateway: false,
        is_local: true,
        default_api_base: "http://localhost:1337/v1",
    },
    // 2. OpenRouter — gateway for hundreds of hosted models
    ProviderSpec {
        name: "openrouter",
        keywords: &["openrouter"],
        display_name: "OpenRouter",
        strip_prefixes: &["openrouter/"],
        is_gateway: true,
        is_local: false,
        default_api_base: "https://openrouter.ai/api/v1",
    },
    // 3. OpenAI
    ProviderSpec {
        name: "openai",
        keywords: &["openai", "gpt"],
        display_name: "OpenAI",
        strip_prefixes: &["openai/"],
        is_gateway: false,
        is_local: false,
        default_api_base: "https://api.openai.com/v1",
    },
    // 4. DeepSeek
    ProviderSpec {
        name: "deepseek",
        keywords: &["deepseek"],
        display_name: "DeepSeek",
        strip_prefixes: &["deepseek/"],
        is_gateway: false,
        is_local: false,
        default_api_base: "https://api.deepseek.com/v1",
    },
    // 5. Groq
    ProviderSpec {
        name: "groq",
        keywords: &["groq"],
        display_name: "Groq",
        strip_prefixes: &["groq/"],
        is_gateway: false,
        is_local: false,
        default_api_base: "https://api.groq.com/openai/v1",
    },
    // 6. Gemini (OpenAI-compatible endpoint)
    ProviderSpec {
        name: "gemini",
        keywords: &["gemini"],
        display_name: "Gemini",
        strip_prefixes: &["gemini/"],
        is_gateway: false,
        is_local: false,
        default_api_base: "https://generativelanguage.googleapis.com/v1beta/openai",
    },
];

// ─────────────────────────────────────────────
// Matching functions
// ─────────────────────────────────────────────

/// Find a provider spec by exact name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Resolve the model name sent upstream by removing a recognised namespace prefix.
pub fn resolve_model_name(model: &str, spec: &ProviderSpec) -> String {
    spec.strip_prefixes
        .iter()
        .find_map(|prefix| model.strip_prefix(prefix))
        .unwrap_or(model)
        .to_string()
}

/// Re-export the provider config from core — single source of truth.
pub use chatrelay_core::config::ProviderConfig;

/// Pair every configured provider with its spec, in registry order.
pub fn configured_providers(
    providers: &HashMap<String, ProviderConfig>,
) -> Vec<(&ProviderConfig, &'static ProviderSpec)> {
    PROVIDERS
        .iter()
        .filter_map(|spec| {
            providers
                .get(spec.name)
                .filter(|c| c.is_configured())
                .map(|c| (c, spec))
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
