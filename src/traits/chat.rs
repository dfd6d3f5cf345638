//! Streaming chat client trait abstraction.
//!
//! The hosted model is an external collaborator: given the prior messages of a
//! thread and a new input, it yields reply text in fragments.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::StreamError;
use crate::models::Message;

/// Finite, non-restartable sequence of reply fragments.
///
/// Concatenating the `Ok` items in yield order gives the full reply. An `Err`
/// item ends the reply early.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

/// Trait for hosted models that stream replies.
///
/// # Example
///
/// ```ignore
/// use futures::StreamExt;
/// use omnicore::traits::ChatStreamClient;
///
/// async fn reply<C: ChatStreamClient>(client: &C) -> Result<String, StreamError> {
///     let mut stream = client.stream_chat(&[], "Hello").await?;
///     let mut text = String::new();
///     while let Some(fragment) = stream.next().await {
///         text.push_str(&fragment?);
///     }
///     Ok(text)
/// }
/// ```
#[async_trait]
pub trait ChatStreamClient: Send + Sync {
    /// Open a reply stream.
    ///
    /// # Arguments
    /// * `history` - Messages of the thread before this submission, in order
    /// * `input` - The new user input
    ///
    /// # Returns
    /// The fragment stream, or an error if the session could not be opened
    async fn stream_chat(&self, history: &[Message], input: &str) -> Result<FragmentStream, StreamError>;
}
