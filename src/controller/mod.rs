//! Interaction controller.
//!
//! Owns the chat session and drives reply streams into it. The controller
//! is cheap to clone; clones share one session, so a host can hand a clone
//! to a spawned task and keep rendering from another.
//!
//! ```text
//! Idle --submit--> Streaming --complete/error--> Idle
//! ```
//!
//! While streaming only selection and deletion are accepted. Neither one
//! retargets or cancels the reply in flight.

mod session;
mod stream;
mod suggestions;

pub use session::{ChatSession, ChatSnapshot, PendingReply, StreamState};
pub use suggestions::{Suggestions, FOLLOW_UP_PROMPTS, STARTER_PROMPTS};

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Local;
use tokio::sync::watch;

use crate::adapters::{FileKeyValueStore, GeminiClient};
use crate::config::{GeminiConfig, StorageConfig};
use crate::error::{ConfigError, StreamError};
use crate::models::Thread;
use crate::persistence::ThreadPersistence;
use crate::traits::ChatStreamClient;

/// Where submitted text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitSource {
    /// The input buffer; cleared on acceptance
    Input,
    /// A suggestion chip; the input buffer is left untouched
    Suggestion(String),
}

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Text is empty after trimming
    EmptyInput,
    /// A reply is already streaming
    Busy,
    /// The target thread vanished before the pair could be appended
    ThreadUnavailable,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing changed
    Rejected(RejectReason),
    /// The stream ran to exhaustion
    Completed {
        thread_id: String,
        message_id: String,
    },
    /// The stream failed; partial reply content is kept
    Failed {
        thread_id: String,
        message_id: String,
        error: StreamError,
    },
}

impl SubmitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed { .. })
    }
}

/// Chat controller over a streaming client.
pub struct ChatController<C> {
    session: Arc<Mutex<ChatSession>>,
    client: Arc<C>,
    revision: Arc<watch::Sender<u64>>,
}

impl<C> Clone for ChatController<C> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            client: Arc::clone(&self.client),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<C: ChatStreamClient> ChatController<C> {
    /// Controller over a session loaded from `persistence`.
    pub fn new(client: C, persistence: ThreadPersistence) -> Self {
        Self::from_session(client, ChatSession::load(persistence))
    }

    /// Controller that keeps threads in memory only.
    pub fn in_memory(client: C) -> Self {
        Self::from_session(client, ChatSession::in_memory())
    }

    pub fn from_session(client: C, session: ChatSession) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            session: Arc::new(Mutex::new(session)),
            client: Arc::new(client),
            revision: Arc::new(revision),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // A poisoned lock means a panic mid-mutation elsewhere; the session
    // itself is still structurally valid.
    fn lock(&self) -> MutexGuard<'_, ChatSession> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Revision counter, bumped on every store change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Submit text and stream the reply to completion.
    pub async fn submit(&self, source: SubmitSource) -> SubmitOutcome {
        match self.start_submit(source) {
            Ok(pending) => self.drive_reply(pending).await,
            Err(reason) => SubmitOutcome::Rejected(reason),
        }
    }

    /// Synchronous half of [`ChatController::submit`].
    ///
    /// On success the store already holds the new message pair and the state
    /// is `Streaming`; pass the result to [`ChatController::drive_reply`].
    pub fn start_submit(&self, source: SubmitSource) -> Result<PendingReply, RejectReason> {
        let result = self.lock().begin_submit(source);
        if result.is_ok() {
            self.notify();
        }
        result
    }

    /// Create an empty thread titled with the local time. Refused while
    /// streaming.
    pub fn new_thread(&self) -> Result<Thread, RejectReason> {
        let thread = self.lock().new_thread(Local::now())?;
        self.notify();
        Ok(thread)
    }

    pub fn select_thread(&self, thread_id: impl Into<String>) {
        self.lock().select_thread(thread_id);
        self.notify();
    }

    pub fn delete_thread(&self, thread_id: &str) -> bool {
        let removed = self.lock().delete_thread(thread_id);
        self.notify();
        removed
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().set_input(text);
        self.notify();
    }

    pub fn input(&self) -> String {
        self.lock().input().to_string()
    }

    pub fn state(&self) -> StreamState {
        self.lock().state()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        self.lock().snapshot()
    }

    pub fn suggestions(&self) -> Suggestions {
        self.lock().suggestions()
    }

    pub fn is_pending_reply(&self, thread_id: &str, message_id: &str) -> bool {
        self.lock().is_pending_reply(thread_id, message_id)
    }

    /// Run `f` against the session under the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&ChatSession) -> R) -> R {
        f(&self.lock())
    }
}

impl ChatController<GeminiClient> {
    /// Production wiring: Gemini replies, threads stored on disk.
    pub fn open(gemini: GeminiConfig, storage: &StorageConfig) -> Result<Self, ConfigError> {
        gemini.validate()?;
        let client = GeminiClient::new(gemini)?;
        let store = FileKeyValueStore::from_config(storage);
        let persistence = ThreadPersistence::from_config(Arc::new(store), storage);
        Ok(Self::new(client, persistence))
    }
}
