//! Reply shape decoding.
//!
//! Completion backends do not agree on a response format. A body may be bare
//! text, an OpenAI-style `choices` envelope, a `{"response": ...}` wrapper, or
//! something else entirely. [`ReplyShape::decode`] runs an ordered list of
//! matchers over the body and keeps the first hit.

use serde_json::Value;

/// A provider reply, classified by the shape it arrived in.
#[derive(Clone, Debug, PartialEq)]
pub enum ReplyShape {
    /// Plain text (non-JSON body or a bare JSON string).
    PlainText(String),
    /// `choices[0].message.content`.
    ChoiceWrapped(String),
    /// Top-level `response` field.
    ReplyWrapped(String),
    /// Anything else; rendered verbatim.
    Unknown(Value),
}

type Matcher = fn(&Value) -> Option<ReplyShape>;

/// Tried in order; the first `Some` wins.
const MATCHERS: &[Matcher] = &[match_plain_text, match_choice_wrapped, match_reply_wrapped];

impl ReplyShape {
    /// Classify a raw response body.
    pub fn decode(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from_value(value),
            Err(_) => ReplyShape::PlainText(body.to_string()),
        }
    }

    /// Classify an already-parsed JSON value.
    pub fn from_value(value: Value) -> Self {
        MATCHERS
            .iter()
            .find_map(|matcher| matcher(&value))
            .unwrap_or(ReplyShape::Unknown(value))
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyShape::PlainText(_) => "plain_text",
            ReplyShape::ChoiceWrapped(_) => "choice_wrapped",
            ReplyShape::ReplyWrapped(_) => "reply_wrapped",
            ReplyShape::Unknown(_) => "unknown",
        }
    }

    /// The reply text to show the user.
    pub fn into_text(self) -> String {
        match self {
            ReplyShape::PlainText(text)
            | ReplyShape::ChoiceWrapped(text)
            | ReplyShape::ReplyWrapped(text) => text,
            ReplyShape::Unknown(value) => value.to_string(),
        }
    }
}

fn match_plain_text(value: &Value) -> Option<ReplyShape> {
    value.as_str().map(|s| ReplyShape::PlainText(s.to_string()))
}

fn match_choice_wrapped(value: &Value) -> Option<ReplyShape> {
    value
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| ReplyShape::ChoiceWrapped(s.to_string()))
}

fn match_reply_wrapped(value: &Value) -> Option<ReplyShape> {
    let reply = value.get("response")?;
    let text = match reply.as_str() {
        Some(s) => s.to_string(),
        None => reply.to_string(),
    };
    Some(ReplyShape::ReplyWrapped(text))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
