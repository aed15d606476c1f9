//! Completion provider trait — the seam between the services and any backend.
//!
//! The `HttpProvider` in `http_provider.rs` covers every OpenAI-compatible API;
//! tests plug in their own implementations.

use async_trait::async_trait;
use chatrelay_core::types::Message;

use crate::error::ProviderError;
use crate::reply::ReplyShape;

/// Trait that all completion providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation history, oldest first.
    /// * `model`    — Model identifier as requested by the caller.
    ///
    /// # Returns
    /// The reply in whatever shape the backend produced it.
    async fn chat(&self, messages: &[Message], model: &str) -> Result<ReplyShape, ProviderError>;

    /// Models this provider advertises. Queried fresh on every call.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;

    /// Whether this provider serves `model` directly (keyword match).
    fn supports_model(&self, model: &str) -> bool;

    /// Gateways and local bridges accept any model and catch unmatched requests.
    fn is_fallback(&self) -> bool {
        false
    }

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
