//! Ephemeral conversation store used by the ask service.
//!
//! Conversations live only in memory and are keyed by a generated UUID.
//! History is capped: once a conversation grows past
//! [`MAX_RETAINED_TURNS`] + 1 messages, only the system message (if any)
//! and the most recent turns are kept.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;
use uuid::Uuid;

use super::SessionError;
use crate::types::Message;

/// Non-system messages kept after truncation.
pub const MAX_RETAINED_TURNS: usize = 20;

/// Truncation kicks in once a conversation holds more than this many messages.
const TRUNCATE_ABOVE: usize = MAX_RETAINED_TURNS + 1;

/// One in-memory conversation.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

/// Manages ephemeral conversations keyed by conversation id.
///
/// Each call takes the lock once; a request that reads, calls the provider
/// and then appends is not atomic as a whole.
#[derive(Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a conversation id, creating the conversation if needed.
    ///
    /// - `None` (or an empty id) → a fresh UUID with an empty history
    /// - unknown id → an empty history registered under that id
    /// - known id → its current history
    pub fn get_or_create(&self, id: Option<&str>) -> (String, Vec<Message>) {
        let mut conversations = self.write();

        let id = match id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => loop {
                let candidate = Uuid::new_v4().to_string();
                if !conversations.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let conversation = conversations.entry(id.clone()).or_insert_with(|| {
            debug!(conversation = %id, "created conversation");
            Conversation::default()
        });

        (id, conversation.messages.clone())
    }

    /// Append a message to an existing conversation.
    pub fn append(&self, id: &str, message: Message) -> Result<(), SessionError> {
        let mut conversations = self.write();
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownConversation(id.to_string()))?;
        conversation.messages.push(message);
        Ok(())
    }

    /// Enforce the history cap on a stored conversation.
    ///
    /// Only acts when the conversation holds more than 21 messages. Unknown ids
    /// are ignored.
    pub fn truncate(&self, id: &str) {
        let mut conversations = self.write();
        if let Some(conversation) = conversations.get_mut(id) {
            if conversation.messages.len() > TRUNCATE_ABOVE {
                let before = conversation.messages.len();
                conversation.messages = truncate_history(
                    std::mem::take(&mut conversation.messages),
                    MAX_RETAINED_TURNS,
                );
                debug!(
                    conversation = %id,
                    before,
                    after = conversation.messages.len(),
                    "truncated conversation"
                );
            }
        }
    }

    /// Snapshot of a conversation's history.
    pub fn messages(&self, id: &str) -> Option<Vec<Message>> {
        self.read().get(id).map(|c| c.messages.clone())
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Conversation>> {
        self.conversations
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Conversation>> {
        self.conversations
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Insert `prompt` as a system message at position 0 unless one is present.
pub fn ensure_system_prompt(messages: &mut Vec<Message>, prompt: &str) {
    if !messages.iter().any(Message::is_system) {
        messages.insert(0, Message::system(prompt));
    }
}

/// Keep the first system message plus the last `max_turns` non-system messages.
fn truncate_history(messages: Vec<Message>, max_turns: usize) -> Vec<Message> {
    let system = messages.iter().find(|m| m.is_system()).cloned();
    let turns: Vec<Message> = messages.into_iter().filter(|m| !m.is_system()).collect();
    let skip = turns.len().saturating_sub(max_turns);

    system.into_iter().chain(turns.into_iter().skip(skip)).collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
