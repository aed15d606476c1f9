//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use chatrelay_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Ask service port: {}", cfg.ask.port);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config, save_config};
pub use schema::{AskConfig, Config, MemoryConfig, ProviderConfig, ProvidersConfig};
