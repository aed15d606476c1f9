//! HTTP front ends for Chatrelay.
//!
//! Two independent routers share the provider layer but never a store:
//!
//! - [`ask`] — ephemeral conversations keyed by generated UUIDs, capped history
//! - [`memory`] — file-persisted sessions keyed by caller-supplied ids

pub mod ask;
pub mod error;
pub mod memory;

use std::net::{IpAddr, SocketAddr};

use anyhow::Context;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub use ask::AskState;
pub use error::ApiError;
pub use memory::MemoryState;

/// `GET /health` payload shared by both services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: String,
    pub service: String,
    pub version: String,
}

pub(crate) fn health_of(service: &str) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        service: service.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Any origin, method and header.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Bind `host:port` and serve `router` until Ctrl+C.
pub async fn serve(router: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("invalid bind host '{host}'"))?;
    let addr = SocketAddr::from((ip, port));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
