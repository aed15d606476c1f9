//! Configuration schema.
//!
//! Hierarchy: `Config` → `AskConfig`, `MemoryConfig`, `ProvidersConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default instruction inserted ahead of every ask-service conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's questions accurately and clearly.";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.chatrelay/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub ask: AskConfig,
    pub memory: MemoryConfig,
    pub providers: ProvidersConfig,
}

// ─────────────────────────────────────────────
// Ask service
// ─────────────────────────────────────────────

/// Settings for the ephemeral-conversation service (`/ask`, `/models`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AskConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Model used when the request names none, or one the catalog doesn't list.
    pub default_model: String,
    /// System instruction prepended to conversations that lack one.
    pub system_prompt: String,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            default_model: "gpt-4".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Memory service
// ─────────────────────────────────────────────

/// Settings for the persisted-session service (`/api/generate`, `/api/clear`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemoryConfig {
    pub host: String,
    pub port: u16,
    /// Model every generate call is sent to.
    pub model: String,
    /// Path of the JSON session snapshot. `~` is expanded.
    pub memory_file: String,
    /// Session id used when the request omits `sessionId`.
    pub default_session: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            model: "gpt-3.5-turbo".to_string(),
            memory_file: "conversation_memory.json".to_string(),
            default_session: "default".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single completion provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Turn on a provider that needs no API key (local bridges).
    pub enabled: bool,
    /// API key for Bearer authentication.
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider should be instantiated.
    pub fn is_configured(&self) -> bool {
        self.enabled || !self.api_key.is_empty()
    }
}

/// All provider configurations, one per registry entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub interference: ProviderConfig,
    pub openrouter: ProviderConfig,
    pub openai: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub groq: ProviderConfig,
    pub gemini: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            // The local free-tier bridge works without a key, so it is on by default.
            interference: ProviderConfig {
                enabled: true,
                ..Default::default()
            },
            openrouter: ProviderConfig::default(),
            openai: ProviderConfig::default(),
            deepseek: ProviderConfig::default(),
            groq: ProviderConfig::default(),
            gemini: ProviderConfig::default(),
        }
    }
}

impl ProvidersConfig {
    fn entries(&self) -> [(&'static str, &ProviderConfig); 6] {
        [
            ("interference", &self.interference),
            ("openrouter", &self.openrouter),
            ("openai", &self.openai),
            ("deepseek", &self.deepseek),
            ("groq", &self.groq),
            ("gemini", &self.gemini),
        ]
    }

    /// Get a provider config by name (e.g. `"openai"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
    }

    pub(crate) fn get_mut_by_name(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "interference" => Some(&mut self.interference),
            "openrouter" => Some(&mut self.openrouter),
            "openai" => Some(&mut self.openai),
            "deepseek" => Some(&mut self.deepseek),
            "groq" => Some(&mut self.groq),
            "gemini" => Some(&mut self.gemini),
            _ => None,
        }
    }

    /// Convert to a map for use with the provider registry.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        self.entries()
            .into_iter()
            .map(|(name, config)| (name.to_string(), config.clone()))
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
