use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, new_id, now_millis, Message};

/// Maximum number of characters taken from the first input for a thread title.
pub const TITLE_MAX_CHARS: usize = 20;

/// Prefix used for threads created through the explicit "new thread" action.
pub const NEW_THREAD_TITLE_PREFIX: &str = "New thread";

/// Represents a persisted conversation thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// Opaque identifier, unique within the collection
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display label, fixed at creation
    #[serde(default)]
    pub title: String,
    /// Messages in append order
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Bumped on every message append, stored as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Create an empty thread with a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            messages: Vec::new(),
            updated_at: now_millis(),
        }
    }

    /// Find a message by id.
    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    /// The most recently appended message, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Title for a thread created implicitly from free text: its first
/// [`TITLE_MAX_CHARS`] characters.
///
/// Counts characters rather than bytes so multi-byte input never splits.
pub fn title_from_input(input: &str) -> String {
    input.chars().take(TITLE_MAX_CHARS).collect()
}

/// Title for a thread created by the explicit "new thread" action.
pub fn timestamp_title(now: DateTime<Local>) -> String {
    format!("{} {}", NEW_THREAD_TITLE_PREFIX, now.format("%H:%M"))
}
