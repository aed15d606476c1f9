//! Config loader — reads `~/.chatrelay/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.chatrelay/config.json` (or an explicit path)
//! 3. Environment variables `CHATRELAY_<SECTION>__<FIELD>` (override JSON)
//! 4. `PORT` for the memory service port

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given or default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `CHATRELAY_ASK__HOST`, `CHATRELAY_ASK__PORT`
/// - `CHATRELAY_ASK__DEFAULT_MODEL`, `CHATRELAY_ASK__SYSTEM_PROMPT`
/// - `CHATRELAY_MEMORY__HOST`, `CHATRELAY_MEMORY__PORT` (or plain `PORT`)
/// - `CHATRELAY_MEMORY__MODEL`, `CHATRELAY_MEMORY__MEMORY_FILE`
/// - `CHATRELAY_PROVIDERS__<NAME>__API_KEY`, `CHATRELAY_PROVIDERS__<NAME>__API_BASE`
fn apply_env_overrides(mut config: Config) -> Config {
    // Ask service
    if let Ok(val) = std::env::var("CHATRELAY_ASK__HOST") {
        config.ask.host = val;
    }
    if let Some(port) = env_port("CHATRELAY_ASK__PORT") {
        config.ask.port = port;
    }
    if let Ok(val) = std::env::var("CHATRELAY_ASK__DEFAULT_MODEL") {
        config.ask.default_model = val;
    }
    if let Ok(val) = std::env::var("CHATRELAY_ASK__SYSTEM_PROMPT") {
        config.ask.system_prompt = val;
    }

    // Memory service — the bare PORT variable is honoured for hosted deployments.
    if let Ok(val) = std::env::var("CHATRELAY_MEMORY__HOST") {
        config.memory.host = val;
    }
    if let Some(port) = env_port("PORT") {
        config.memory.port = port;
    }
    if let Some(port) = env_port("CHATRELAY_MEMORY__PORT") {
        config.memory.port = port;
    }
    if let Ok(val) = std::env::var("CHATRELAY_MEMORY__MODEL") {
        config.memory.model = val;
    }
    if let Ok(val) = std::env::var("CHATRELAY_MEMORY__MEMORY_FILE") {
        config.memory.memory_file = val;
    }

    // Providers
    for name in ["interference", "openrouter", "openai", "deepseek", "groq", "gemini"] {
        if let Some(provider) = config.providers.get_mut_by_name(name) {
            apply_provider_env(provider, &name.to_uppercase());
        }
    }

    config
}

fn env_port(var: &str) -> Option<u16> {
    let val = std::env::var(var).ok()?;
    match val.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            warn!("Ignoring {}={}: not a valid port", var, val);
            None
        }
    }
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut super::schema::ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("CHATRELAY_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("CHATRELAY_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
