//! Core types for Chatrelay — role-tagged chat messages.
//!
//! Messages use the OpenAI chat completions shape (`{"role": ..., "content": ...}`)
//! both on the wire to providers and in the persisted session file.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────

/// Who authored a message.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// The wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────

/// A chat message. Immutable once appended to a conversation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serializes_role_and_content() {
        let msg = Message::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_message_deserializes_all_roles() {
        let raw = r#"[
            {"role": "system", "content": "be brief"},
            {"role": "user", "content": "hi"},
            {"role": "assistant", "content": "hello"}
        ]"#;
        let msgs: Vec<Message> = serde_json::from_str(raw).unwrap();
        assert_eq!(msgs[0], Message::system("be brief"));
        assert_eq!(msgs[1], Message::user("hi"));
        assert_eq!(msgs[2], Message::assistant("hello"));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let raw = r#"{"role": "tool", "content": "x"}"#;
        assert!(serde_json::from_str::<Message>(raw).is_err());
    }

    #[test]
    fn test_is_system() {
        assert!(Message::system("x").is_system());
        assert!(!Message::assistant("x").is_system());
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
