//! Ask service — ephemeral conversations with a rolling history cap.
//!
//! Routes:
//! - `GET  /models` → `{"models": [...]}`
//! - `POST /ask`    → `{"response", "conversation_id"}`
//! - `GET  /health`
//!
//! Provider failures never change the status code here: the error is
//! rendered into `response` and the caller gets a 200.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use chatrelay_core::config::AskConfig;
use chatrelay_core::session::{ensure_system_prompt, ConversationStore};
use chatrelay_core::types::Message;
use chatrelay_providers::{CompletionGateway, ModelCatalog, ProviderHub};

use crate::{cors_layer, health_of, Health};

/// Prefix of the reply text returned when a completion fails.
pub const ERROR_REPLY_PREFIX: &str = "An error occurred while processing: ";

// ─────────────────────────────────────────────
// State
// ─────────────────────────────────────────────

#[derive(Clone)]
pub struct AskState {
    pub conversations: Arc<ConversationStore>,
    pub gateway: CompletionGateway,
    pub catalog: ModelCatalog,
    pub default_model: String,
    pub system_prompt: String,
}

impl AskState {
    /// Fresh, empty conversation store over the given providers.
    pub fn new(hub: Arc<ProviderHub>, config: &AskConfig) -> Self {
        AskState {
            conversations: Arc::new(ConversationStore::new()),
            gateway: CompletionGateway::new(hub.clone()),
            catalog: ModelCatalog::new(hub),
            default_model: config.default_model.clone(),
            system_prompt: config.system_prompt.clone(),
        }
    }
}

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub text: String,
    /// Falls back to the configured default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskResponse {
    pub response: String,
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

pub fn router(state: AskState) -> Router {
    Router::new()
        .route("/models", get(list_models))
        .route("/ask", post(ask))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

async fn list_models(State(state): State<AskState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.catalog.list_models().await,
    })
}

async fn health() -> Json<Health> {
    health_of("ask")
}

async fn ask(State(state): State<AskState>, Json(request): Json<AskRequest>) -> Json<AskResponse> {
    let (conversation_id, _) = state
        .conversations
        .get_or_create(request.conversation_id.as_deref());

    let model = request
        .model
        .unwrap_or_else(|| state.default_model.clone());

    let response = match answer(&state, &conversation_id, request.text, &model).await {
        Ok(text) => text,
        Err(e) => {
            error!(conversation = %conversation_id, error = %e, "Ask failed");
            format!("{ERROR_REPLY_PREFIX}{e}")
        }
    };

    Json(AskResponse {
        response,
        conversation_id,
    })
}

/// Store the question, ask the provider, store the answer, enforce the cap.
///
/// The user message stays stored even when the completion fails; the error
/// text is never stored.
async fn answer(
    state: &AskState,
    conversation_id: &str,
    text: String,
    requested_model: &str,
) -> anyhow::Result<String> {
    state
        .conversations
        .append(conversation_id, Message::user(text))?;

    let mut messages = state
        .conversations
        .messages(conversation_id)
        .unwrap_or_default();
    ensure_system_prompt(&mut messages, &state.system_prompt);

    let model = state
        .catalog
        .resolve(requested_model, &state.default_model)
        .await;

    let reply = state.gateway.complete(&model, &messages).await?;

    state
        .conversations
        .append(conversation_id, Message::assistant(reply.clone()))?;
    state.conversations.truncate(conversation_id);

    info!(
        conversation = %conversation_id,
        model = %model,
        reply_len = reply.len(),
        "Ask answered"
    );
    Ok(reply)
}
