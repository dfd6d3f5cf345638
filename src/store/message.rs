//! Message management methods for ThreadStore

use crate::models::{now_millis, Message, MessageRole};

use super::ThreadStore;

/// Ids of the message pair created by a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendedPair {
    pub user_message_id: String,
    pub model_message_id: String,
}

impl ThreadStore {
    /// Append a user message and an empty model placeholder to a thread.
    ///
    /// Both messages are pushed in one step, user first, and the thread's
    /// `updated_at` is bumped. Returns `None` without touching anything if the
    /// thread does not exist.
    pub fn append_pair(&mut self, thread_id: &str, user_content: impl Into<String>) -> Option<AppendedPair> {
        let thread = self.get_thread_mut(thread_id)?;
        let now = now_millis();

        let user_message = Message::new_at(MessageRole::User, user_content, now);
        let model_message = Message::placeholder_reply(now);

        let pair = AppendedPair {
            user_message_id: user_message.id.clone(),
            model_message_id: model_message.id.clone(),
        };

        thread.messages.extend([user_message, model_message]);
        thread.updated_at = now;

        Some(pair)
    }

    /// Replace the content of a message in place.
    ///
    /// Returns `false` when the thread or message is gone (e.g. the thread was
    /// deleted mid-stream); that case is not an error.
    pub fn update_message_content(
        &mut self,
        thread_id: &str,
        message_id: &str,
        content: impl Into<String>,
    ) -> bool {
        let Some(thread) = self.get_thread_mut(thread_id) else {
            return false;
        };

        // The streaming target is almost always the trailing message
        match thread.messages.iter_mut().rev().find(|m| m.id == message_id) {
            Some(message) => {
                message.content = content.into();
                true
            }
            None => false,
        }
    }
}
