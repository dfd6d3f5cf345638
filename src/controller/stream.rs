//! Reply stream driver.
//!
//! Fragments are folded into a running string and each accumulated value is
//! committed to the store before the next fragment is awaited. The session
//! lock is only taken between awaits.
//!
//! Dropping the driver future mid-stream (a host timeout, `select!`, an
//! aborted task) still returns the session to `Idle`; partial content stays.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

use crate::error::StreamError;
use crate::traits::ChatStreamClient;

use super::{ChatController, ChatSession, PendingReply, SubmitOutcome};

/// Returns the session to `Idle` when dropped, however the stream ended.
struct StreamingGuard<'a> {
    session: &'a Arc<Mutex<ChatSession>>,
    revision: &'a watch::Sender<u64>,
    thread_id: &'a str,
    completed: bool,
}

impl Drop for StreamingGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!(thread_id = %self.thread_id, "Reply stream dropped before it ended");
        }
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .finish_stream();
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

impl<C: ChatStreamClient> ChatController<C> {
    /// Stream the reply for an accepted submission and return to idle.
    ///
    /// Cancel-safe: if this future is dropped before the stream ends, the
    /// session still leaves `Streaming`.
    pub async fn drive_reply(&self, pending: PendingReply) -> SubmitOutcome {
        let mut guard = StreamingGuard {
            session: &self.session,
            revision: &self.revision,
            thread_id: &pending.thread_id,
            completed: false,
        };
        let result = self.stream_into_store(&pending).await;
        guard.completed = true;
        drop(guard);

        match result {
            Ok(chars) => {
                info!(
                    thread_id = %pending.thread_id,
                    chars,
                    "Reply stream completed"
                );
                SubmitOutcome::Completed {
                    thread_id: pending.thread_id,
                    message_id: pending.model_message_id,
                }
            }
            Err(e) => {
                error!(
                    thread_id = %pending.thread_id,
                    code = e.error_code(),
                    "Reply stream failed: {}",
                    e
                );
                SubmitOutcome::Failed {
                    thread_id: pending.thread_id,
                    message_id: pending.model_message_id,
                    error: e,
                }
            }
        }
    }

    /// Returns the number of characters received.
    async fn stream_into_store(&self, pending: &PendingReply) -> Result<usize, StreamError> {
        let mut fragments = self
            .client
            .stream_chat(&pending.history, &pending.input)
            .await?;

        let mut accumulated = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            accumulated.push_str(&fragment);

            let applied = self.lock().apply_reply_text(pending, &accumulated);
            if applied {
                self.notify();
            } else {
                trace!(thread_id = %pending.thread_id, "Reply target gone, fragment dropped");
            }
        }

        debug!(thread_id = %pending.thread_id, "Reply stream exhausted");
        Ok(accumulated.chars().count())
    }
}
