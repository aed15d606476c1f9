//! Chatrelay core — message types, configuration, and conversation stores.
//!
//! - [`types`]: role-tagged chat messages
//! - [`config`]: JSON config file + env overrides
//! - [`session`]: the ephemeral conversation store and the persisted session store
//! - [`utils`]: path helpers

pub mod config;
pub mod session;
pub mod types;
pub mod utils;

pub use types::{Message, Role};
