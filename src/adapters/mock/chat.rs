//! Mock streaming chat clients for testing.
//!
//! - [`ScriptedChatClient`] replays fixed fragment scripts, one per call
//! - [`ChannelChatClient`] lets the test push fragments while the
//!   controller is awaiting them

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::stream;

use crate::error::StreamError;
use crate::models::Message;
use crate::traits::{ChatStreamClient, FragmentStream};

/// A recorded `stream_chat` call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// History passed to the client
    pub history: Vec<Message>,
    /// New input passed to the client
    pub input: String,
}

/// One scripted reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    /// Yield the fragments, then fail if an error is given
    Reply {
        fragments: Vec<String>,
        failure: Option<StreamError>,
    },
    /// Fail before any fragment is produced
    OpenError(StreamError),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Chat client that replays queued scripts in order.
///
/// # Example
///
/// ```ignore
/// use omnicore::adapters::mock::ScriptedChatClient;
///
/// let client = ScriptedChatClient::new()
///     .with_reply(["Hel", "lo"])
///     .with_failure_after(["par"], StreamError::Http("reset".into()));
///
/// // first call yields "Hel", "lo"; second yields "par" then the error
/// let calls = client.calls();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedChatClient {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply that completes normally.
    pub fn with_reply<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_script(Script::Reply {
            fragments: fragments.into_iter().map(Into::into).collect(),
            failure: None,
        });
        self
    }

    /// Queue a reply that fails after yielding `fragments`.
    pub fn with_failure_after<I, S>(self, fragments: I, error: StreamError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_script(Script::Reply {
            fragments: fragments.into_iter().map(Into::into).collect(),
            failure: Some(error),
        });
        self
    }

    /// Queue a call that fails to open.
    pub fn with_open_error(self, error: StreamError) -> Self {
        self.push_script(Script::OpenError(error));
        self
    }

    pub fn push_script(&self, script: Script) {
        lock(&self.scripts).push_back(script);
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Scripts not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.scripts).len()
    }
}

#[async_trait]
impl ChatStreamClient for ScriptedChatClient {
    async fn stream_chat(&self, history: &[Message], input: &str) -> Result<FragmentStream, StreamError> {
        lock(&self.calls).push(RecordedCall {
            history: history.to_vec(),
            input: input.to_string(),
        });

        let script = lock(&self.scripts).pop_front();
        match script {
            Some(Script::Reply { fragments, failure }) => {
                let items = fragments
                    .into_iter()
                    .map(Ok::<String, StreamError>)
                    .chain(failure.into_iter().map(Err::<String, StreamError>));
                Ok(Box::pin(stream::iter(items)))
            }
            Some(Script::OpenError(error)) => Err(error),
            None => Err(StreamError::Closed("no scripted reply left".to_string())),
        }
    }
}

/// Sending half of a [`ChannelChatClient`] reply.
///
/// Dropping it (or calling [`FragmentSender::finish`]) ends the reply
/// normally.
pub struct FragmentSender {
    tx: mpsc::UnboundedSender<Result<String, StreamError>>,
}

impl FragmentSender {
    /// Push a fragment. Returns false once the receiving stream is gone.
    pub fn send(&self, fragment: impl Into<String>) -> bool {
        self.tx.unbounded_send(Ok(fragment.into())).is_ok()
    }

    /// Push an error; the reply ends after it.
    pub fn fail(self, error: StreamError) -> bool {
        self.tx.unbounded_send(Err(error)).is_ok()
    }

    /// End the reply normally.
    pub fn finish(self) {}
}

/// Chat client whose replies are fed by the test through channels.
///
/// Each [`ChannelChatClient::prepare`] queues one reply; the next
/// `stream_chat` call takes it. Calls with nothing prepared fail to open.
#[derive(Clone, Default)]
pub struct ChannelChatClient {
    receivers: Arc<Mutex<VecDeque<mpsc::UnboundedReceiver<Result<String, StreamError>>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl std::fmt::Debug for ChannelChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelChatClient")
            .field("prepared", &lock(&self.receivers).len())
            .field("calls", &lock(&self.calls).len())
            .finish()
    }
}

impl ChannelChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply and return the sender that drives it.
    pub fn prepare(&self) -> FragmentSender {
        let (tx, rx) = mpsc::unbounded();
        lock(&self.receivers).push_back(rx);
        FragmentSender { tx }
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl ChatStreamClient for ChannelChatClient {
    async fn stream_chat(&self, history: &[Message], input: &str) -> Result<FragmentStream, StreamError> {
        lock(&self.calls).push(RecordedCall {
            history: history.to_vec(),
            input: input.to_string(),
        });

        match lock(&self.receivers).pop_front() {
            Some(rx) => Ok(Box::pin(rx)),
            None => Err(StreamError::Closed("no prepared reply".to_string())),
        }
    }
}
