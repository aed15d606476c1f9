//! Completion provider layer for Chatrelay.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — trait that all providers implement
//! - [`registry`] — static specs for the supported providers + matching logic
//! - [`http_provider::HttpProvider`] — generic OpenAI-compatible HTTP client
//! - [`reply::ReplyShape`] — classification of heterogeneous reply bodies
//! - [`hub::ProviderHub`] — configured providers and model routing
//! - [`gateway::CompletionGateway`] — model + messages → reply text
//! - [`catalog::ModelCatalog`] — deduplicated model list with static fallback

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod http_provider;
pub mod hub;
pub mod registry;
pub mod reply;
pub mod traits;

// Re-export main types for convenience
pub use catalog::{ModelCatalog, FALLBACK_MODELS};
pub use error::ProviderError;
pub use gateway::CompletionGateway;
pub use http_provider::HttpProvider;
pub use hub::ProviderHub;
pub use registry::{ProviderConfig, ProviderSpec, PROVIDERS};
pub use reply::ReplyShape;
pub use traits::LlmProvider;
