//! Completion gateway — a thin call-through from the services to the provider hub.

use std::sync::Arc;

use tracing::{debug, error};

use chatrelay_core::types::Message;

use crate::error::ProviderError;
use crate::hub::ProviderHub;

/// Turns a model name plus message history into reply text.
#[derive(Clone)]
pub struct CompletionGateway {
    hub: Arc<ProviderHub>,
}

impl CompletionGateway {
    pub fn new(hub: Arc<ProviderHub>) -> Self {
        CompletionGateway { hub }
    }

    /// Route `model` to a provider, send `messages`, and flatten the reply to text.
    pub async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, ProviderError> {
        let provider = self
            .hub
            .route(model)
            .ok_or_else(|| ProviderError::NoProvider(model.to_string()))?;

        debug!(provider = provider.display_name(), model, "Routing completion");

        match provider.chat(messages, model).await {
            Ok(reply) => Ok(reply.into_text()),
            Err(e) => {
                error!(provider = provider.display_name(), model, error = %e, "Completion failed");
                Err(e)
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
