//! Chatrelay CLI — entry point.
//!
//! # Commands
//!
//! - `chatrelay ask-server [--port]` — ephemeral-conversation service (`/ask`, `/models`)
//! - `chatrelay memory-server [--port] [--memory-file]` — persisted-session service (`/api/*`)
//! - `chatrelay models` — print the model catalog
//! - `chatrelay status` — show configuration and provider status
//! - `chatrelay init` — write a default config file

mod helpers;
mod init;
mod models;
mod serve;
mod status;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chatrelay_core::config::load_config;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Chatrelay — chat completion relay services
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.chatrelay/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ask service (ephemeral conversations)
    AskServer {
        /// Listen port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Run the memory service (file-persisted sessions)
    MemoryServer {
        /// Listen port (overrides config and $PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Session snapshot file (overrides config)
        #[arg(long)]
        memory_file: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List the models the providers advertise
    Models {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default configuration file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::AskServer { port, logs } => {
            init_logging(logs);
            let mut config = load_config(config_path);
            if let Some(port) = port {
                config.ask.port = port;
            }
            serve::run_ask(&config).await
        }
        Commands::MemoryServer {
            port,
            memory_file,
            logs,
        } => {
            init_logging(logs);
            let mut config = load_config(config_path);
            if let Some(port) = port {
                config.memory.port = port;
            }
            if let Some(file) = memory_file {
                config.memory.memory_file = file;
            }
            serve::run_memory(&config).await
        }
        Commands::Models { logs } => {
            init_logging(logs);
            models::run(&load_config(config_path)).await
        }
        Commands::Status => status::run(config_path),
        Commands::Init => init::run(config_path),
    }
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("chatrelay=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
