//! Provider hub — the configured set of providers and the routing between them.

use std::sync::Arc;

use tracing::{debug, warn};

use chatrelay_core::config::ProvidersConfig;

use crate::http_provider::HttpProvider;
use crate::registry::configured_providers;
use crate::traits::LlmProvider;

/// Ordered collection of live providers.
///
/// Order matters: routing and model enumeration both walk providers front to back.
#[derive(Clone, Default)]
pub struct ProviderHub {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl ProviderHub {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        ProviderHub { providers }
    }

    /// Build an `HttpProvider` for every configured registry entry.
    ///
    /// Providers whose HTTP client cannot be built are logged and skipped.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        let map = config.to_map();
        let providers = configured_providers(&map)
            .into_iter()
            .filter_map(|(provider_config, spec)| {
                match HttpProvider::new(provider_config, spec) {
                    Ok(provider) => {
                        debug!(provider = spec.display_name, "Provider enabled");
                        Some(Arc::new(provider) as Arc<dyn LlmProvider>)
                    }
                    Err(e) => {
                        warn!(provider = spec.display_name, error = %e, "Skipping provider");
                        None
                    }
                }
            })
            .collect();

        ProviderHub { providers }
    }

    /// Pick the provider for a model.
    ///
    /// 1. First provider whose keywords match the model.
    /// 2. Otherwise the first gateway or local bridge.
    pub fn route(&self, model: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers
            .iter()
            .find(|p| p.supports_model(model))
            .or_else(|| self.providers.iter().find(|p| p.is_fallback()))
            .cloned()
    }

    pub fn providers(&self) -> &[Arc<dyn LlmProvider>] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
