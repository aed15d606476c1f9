//! Model catalog — which model identifiers a request may select.
//!
//! Enumerated fresh from every provider on each call; nothing is cached.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::hub::ProviderHub;

/// Returned when no provider advertises any model.
pub const FALLBACK_MODELS: &[&str] = &["gpt-4", "gpt-3.5-turbo"];

/// Aggregates the model lists advertised by the hub's providers.
#[derive(Clone)]
pub struct ModelCatalog {
    hub: Arc<ProviderHub>,
}

impl ModelCatalog {
    pub fn new(hub: Arc<ProviderHub>) -> Self {
        ModelCatalog { hub }
    }

    /// Distinct model ids in provider order, first occurrence wins.
    ///
    /// Providers that fail to enumerate are logged and skipped. If nothing
    /// is found at all, [`FALLBACK_MODELS`] is returned.
    pub async fn list_models(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::new();

        for provider in self.hub.providers() {
            match provider.list_models().await {
                Ok(advertised) => {
                    debug!(
                        provider = provider.display_name(),
                        count = advertised.len(),
                        "Provider models listed"
                    );
                    for model in advertised {
                        if !models.contains(&model) {
                            models.push(model);
                        }
                    }
                }
                Err(e) => {
                    warn!(provider = provider.display_name(), error = %e, "Skipping provider in model listing");
                }
            }
        }

        if models.is_empty() {
            return FALLBACK_MODELS.iter().map(|m| m.to_string()).collect();
        }
        models
    }

    /// `requested` if the catalog lists it, otherwise `default`.
    pub async fn resolve(&self, requested: &str, default: &str) -> String {
        if self.list_models().await.iter().any(|m| m == requested) {
            requested.to_string()
        } else {
            debug!(requested, substitute = default, "Requested model not in catalog");
            default.to_string()
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
