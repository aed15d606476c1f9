//! Memory service — sessions persisted to a JSON file after every change.
//!
//! Routes:
//! - `POST /api/generate` `{prompt?, sessionId?}` → `{"response"}` or 500 `{"error"}`
//! - `POST /api/clear`    `{sessionId?}`          → `{"status": "Memory cleared"}`
//! - `GET  /health`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use chatrelay_core::config::MemoryConfig;
use chatrelay_core::session::SessionStore;
use chatrelay_core::types::Message;
use chatrelay_providers::{CompletionGateway, ProviderHub};

use crate::error::ApiError;
use crate::{cors_layer, health_of, Health};

pub const CLEARED_STATUS: &str = "Memory cleared";

#[derive(Clone)]
pub struct MemoryState {
    pub sessions: Arc<SessionStore>,
    pub gateway: CompletionGateway,
    pub model: String,
    pub default_session: String,
}

impl MemoryState {
    pub fn new(sessions: Arc<SessionStore>, hub: Arc<ProviderHub>, config: &MemoryConfig) -> Self {
        MemoryState {
            sessions,
            gateway: CompletionGateway::new(hub),
            model: config.model.clone(),
            default_session: config.default_session.clone(),
        }
    }

    fn session_id(&self, requested: Option<String>) -> String {
        requested.unwrap_or_else(|| self.default_session.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearResponse {
    pub status: String,
}

pub fn router(state: MemoryState) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/clear", post(clear))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

async fn health() -> Json<Health> {
    health_of("memory")
}

async fn generate(
    State(state): State<MemoryState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;
    let session_id = state.session_id(request.session_id);

    // Persisted before the provider call, so a failed completion keeps the prompt.
    state
        .sessions
        .append(&session_id, Message::user(request.prompt));

    let history = state.sessions.history(&session_id);
    debug!(session = %session_id, messages = history.len(), "Generating");

    let response = state.gateway.complete(&state.model, &history).await?;

    state
        .sessions
        .append(&session_id, Message::assistant(response.clone()));

    info!(session = %session_id, reply_len = response.len(), "Generate answered");
    Ok(Json(GenerateResponse { response }))
}

async fn clear(
    State(state): State<MemoryState>,
    payload: Result<Json<ClearRequest>, JsonRejection>,
) -> Result<Json<ClearResponse>, ApiError> {
    let Json(request) = payload?;
    let session_id = state.session_id(request.session_id);

    state.sessions.clear(&session_id);
    info!(session = %session_id, "Session cleared");

    Ok(Json(ClearResponse {
        status: CLEARED_STATUS.to_string(),
    }))
}
