//! `ask-server` / `memory-server` — build state from config and serve.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use chatrelay_core::config::Config;
use chatrelay_core::session::SessionStore;
use chatrelay_providers::ProviderHub;
use chatrelay_server::{ask, memory, serve, AskState, MemoryState};

use crate::helpers;

fn build_hub(config: &Config) -> Arc<ProviderHub> {
    let hub = ProviderHub::from_config(&config.providers);
    if hub.is_empty() {
        warn!("No providers configured; every completion will fail");
    }
    Arc::new(hub)
}

/// Run the ask service until Ctrl+C.
pub async fn run_ask(config: &Config) -> Result<()> {
    let ask_config = &config.ask;
    helpers::print_banner("ask", &ask_config.host, ask_config.port);

    let state = AskState::new(build_hub(config), ask_config);
    info!(default_model = %ask_config.default_model, "Ask service starting");

    serve(ask::router(state), &ask_config.host, ask_config.port).await
}

/// Run the memory service until Ctrl+C.
pub async fn run_memory(config: &Config) -> Result<()> {
    let memory_config = &config.memory;
    helpers::print_banner("memory", &memory_config.host, memory_config.port);

    let memory_file = helpers::expand_tilde(&memory_config.memory_file);
    let sessions = Arc::new(SessionStore::open(memory_file));
    let state = MemoryState::new(sessions, build_hub(config), memory_config);
    info!(model = %memory_config.model, "Memory service starting");

    serve(memory::router(state), &memory_config.host, memory_config.port).await
}
