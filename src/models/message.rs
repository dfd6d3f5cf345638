use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, new_id, now_millis};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
    System,
}

impl MessageRole {
    /// Role name as the hosted model API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Model => "model",
            MessageRole::System => "system",
        }
    }
}

/// A single message within a thread.
///
/// Only `content` is mutable; it grows while a model reply streams in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Opaque identifier, assigned at creation
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Text body
    #[serde(default)]
    pub content: String,
    /// Creation time, stored as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh id, stamped now.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self::new_at(role, content, now_millis())
    }

    /// Create a message with a fresh id and an explicit timestamp.
    pub fn new_at(role: MessageRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Create the empty model reply that fragments are streamed into.
    pub fn placeholder_reply(timestamp: DateTime<Utc>) -> Self {
        Self::new_at(MessageRole::Model, String::new(), timestamp)
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_model(&self) -> bool {
        self.role == MessageRole::Model
    }
}
