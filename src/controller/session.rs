//! Synchronous chat state owned by the controller.
//!
//! Every mutation here finishes before the controller awaits anything, so a
//! reader never sees a half-applied submission.

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::models::{timestamp_title, title_from_input, Message, Thread};
use crate::persistence::ThreadPersistence;
use crate::store::ThreadStore;

use super::suggestions::Suggestions;
use super::{RejectReason, SubmitSource};

/// Whether a reply is being streamed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Idle,
    Streaming,
}

/// The reply a submission is waiting for.
///
/// Returned by [`ChatSession::begin_submit`] and consumed by the stream
/// driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReply {
    pub thread_id: String,
    pub user_message_id: String,
    pub model_message_id: String,
    /// Thread messages before this submission's pair
    pub history: Vec<Message>,
    /// Submitted text, untrimmed
    pub input: String,
}

/// Read model the UI renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSnapshot {
    pub threads: Vec<Thread>,
    pub active_thread_id: Option<String>,
    pub input: String,
    pub state: StreamState,
    /// `(thread_id, message_id)` of the reply being streamed
    pub pending_reply: Option<(String, String)>,
}

impl ChatSnapshot {
    pub fn active_thread(&self) -> Option<&Thread> {
        let id = self.active_thread_id.as_deref()?;
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn is_streaming(&self) -> bool {
        self.state == StreamState::Streaming
    }
}

/// Thread store plus the interaction state around it.
#[derive(Debug, Default)]
pub struct ChatSession {
    store: ThreadStore,
    input: String,
    state: StreamState,
    in_flight: Option<(String, String)>,
    persistence: Option<ThreadPersistence>,
}

impl ChatSession {
    /// Session without durable storage.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Session loaded from storage; every later mutation is written back.
    pub fn load(persistence: ThreadPersistence) -> Self {
        let threads = persistence.load_or_empty();
        info!(count = threads.len(), "Chat session loaded");
        Self {
            store: ThreadStore::from_threads(threads),
            persistence: Some(persistence),
            ..Self::default()
        }
    }

    /// Session over an existing store, e.g. for tests.
    pub fn with_store(store: ThreadStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save_or_log(self.store.threads());
        }
    }

    /// Run the submit guard and the synchronous half of a submission.
    ///
    /// On success the thread holds the new (user, empty model) pair, the
    /// input buffer is cleared for [`SubmitSource::Input`], and the session
    /// is `Streaming`.
    pub fn begin_submit(&mut self, source: SubmitSource) -> Result<PendingReply, RejectReason> {
        if self.state == StreamState::Streaming {
            return Err(RejectReason::Busy);
        }

        let text = match &source {
            SubmitSource::Input => self.input.clone(),
            SubmitSource::Suggestion(text) => text.clone(),
        };
        if text.trim().is_empty() {
            return Err(RejectReason::EmptyInput);
        }

        // A selection pointing at a deleted thread counts as no selection
        let thread_id = match self.store.active_thread() {
            Some(thread) => thread.id.clone(),
            None => self.store.create_thread(title_from_input(&text)).id,
        };

        let history = self
            .store
            .get_messages(&thread_id)
            .map(<[Message]>::to_vec)
            .unwrap_or_default();

        let pair = self
            .store
            .append_pair(&thread_id, text.as_str())
            .ok_or(RejectReason::ThreadUnavailable)?;

        if matches!(source, SubmitSource::Input) {
            self.input.clear();
        }
        self.state = StreamState::Streaming;
        self.in_flight = Some((thread_id.clone(), pair.model_message_id.clone()));
        self.persist();

        debug!(thread_id = %thread_id, history = history.len(), "Submission accepted");

        Ok(PendingReply {
            thread_id,
            user_message_id: pair.user_message_id,
            model_message_id: pair.model_message_id,
            history,
            input: text,
        })
    }

    /// Commit the accumulated reply text. Returns false if the thread or
    /// message is gone.
    pub fn apply_reply_text(&mut self, pending: &PendingReply, accumulated: &str) -> bool {
        let updated =
            self.store
                .update_message_content(&pending.thread_id, &pending.model_message_id, accumulated);
        if updated {
            self.persist();
        }
        updated
    }

    /// Return to `Idle` after a stream ends, however it ended.
    pub fn finish_stream(&mut self) {
        self.state = StreamState::Idle;
        self.in_flight = None;
    }

    /// Create an empty thread titled with the current local time.
    pub fn new_thread(&mut self, now: DateTime<Local>) -> Result<Thread, RejectReason> {
        if self.state == StreamState::Streaming {
            return Err(RejectReason::Busy);
        }
        let thread = self.store.create_thread(timestamp_title(now));
        self.persist();
        Ok(thread)
    }

    /// Select a thread. Allowed while streaming; the stream keeps its target.
    pub fn select_thread(&mut self, thread_id: impl Into<String>) {
        self.store.select_thread(thread_id);
    }

    /// Delete a thread. Allowed while streaming; later updates to a deleted
    /// streaming thread become no-ops.
    pub fn delete_thread(&mut self, thread_id: &str) -> bool {
        let removed = self.store.delete_thread(thread_id);
        if removed {
            self.persist();
        }
        removed
    }

    /// True for the reply currently being streamed.
    pub fn is_pending_reply(&self, thread_id: &str, message_id: &str) -> bool {
        matches!(&self.in_flight, Some((t, m)) if t == thread_id && m == message_id)
    }

    pub fn suggestions(&self) -> Suggestions {
        Suggestions::for_session(self.store.active_thread(), self.state)
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            threads: self.store.threads().to_vec(),
            active_thread_id: self.store.active_thread_id().map(str::to_string),
            input: self.input.clone(),
            state: self.state,
            pending_reply: self.in_flight.clone(),
        }
    }
}
