//! Conversation stores.
//!
//! Two independent stores with different retention policies:
//!
//! - [`ConversationStore`] — in-memory, keyed by generated UUID, history
//!   capped at one system message plus the last 20 turns.
//! - [`SessionStore`] — keyed by caller-supplied id, unbounded, persisted as a
//!   single JSON file rewritten after every mutation.

pub mod conversation;
pub mod store;

pub use conversation::{ensure_system_prompt, Conversation, ConversationStore, MAX_RETAINED_TURNS};
pub use store::{SessionMap, SessionStore};

/// Errors raised by the conversation stores.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown conversation '{0}'")]
    UnknownConversation(String),
}
