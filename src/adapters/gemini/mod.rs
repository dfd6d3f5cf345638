//! Gemini streaming client adapter.
//!
//! Talks to the `streamGenerateContent` endpoint in SSE mode and turns each
//! `data:` payload into a reply fragment.

pub mod payloads;

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use futures_util::stream;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::error::{ConfigError, StreamError};
use crate::models::Message;
use crate::sse::{LineBuffer, SseFrame, SseParser};
use crate::traits::{ChatStreamClient, FragmentStream};

pub use payloads::{decode_chunk, GenerateContentRequest};

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Client for the hosted Gemini model.
///
/// # Example
///
/// ```ignore
/// use omnicore::adapters::GeminiClient;
/// use omnicore::config::GeminiConfig;
///
/// let client = GeminiClient::new(GeminiConfig::from_env())?;
/// let mut fragments = client.stream_chat(&[], "Hello").await?;
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client with its own connection pool.
    ///
    /// The config is not validated here; a missing API key surfaces as
    /// [`StreamError::MissingApiKey`] when a stream is opened.
    pub fn new(config: GeminiConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Build the request body for a submission.
    pub fn build_request(&self, history: &[Message], input: &str) -> GenerateContentRequest {
        GenerateContentRequest::new(
            history,
            input,
            self.config.system_instruction.as_deref(),
            self.config.thinking_budget,
        )
    }
}

#[async_trait]
impl ChatStreamClient for GeminiClient {
    async fn stream_chat(&self, history: &[Message], input: &str) -> Result<FragmentStream, StreamError> {
        if self.config.api_key.trim().is_empty() {
            return Err(StreamError::MissingApiKey);
        }

        let url = self.config.stream_url();
        let body = self.build_request(history, input);
        debug!(
            model = %self.config.model,
            turns = body.contents.len(),
            "Opening Gemini stream"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = payloads::error_message(&text);
            warn!(status, %message, "Gemini stream request rejected");
            return Err(StreamError::Status { status, message });
        }

        Ok(fragment_stream(Box::pin(response.bytes_stream())))
    }
}

/// Unfold state: raw body, line splitter, frame assembler, and lines not yet
/// fed to the parser.
struct StreamState {
    body: ByteStream,
    lines: LineBuffer,
    parser: SseParser,
    pending: VecDeque<String>,
    body_done: bool,
    finished: bool,
}

/// What a decoded frame means for the stream.
enum FrameOutcome {
    Fragment(String),
    /// Frame without a payload, e.g. a bare `event:` line
    Skip,
    Done,
    Failed(StreamError),
}

fn decode_frame(frame: &SseFrame) -> FrameOutcome {
    if frame.is_done_marker() {
        return FrameOutcome::Done;
    }
    if frame.data.trim().is_empty() {
        return FrameOutcome::Skip;
    }
    match decode_chunk(&frame.data) {
        Ok(text) => FrameOutcome::Fragment(text),
        Err(e) => FrameOutcome::Failed(e),
    }
}

fn fragment_stream(body: ByteStream) -> FragmentStream {
    let state = StreamState {
        body,
        lines: LineBuffer::new(),
        parser: SseParser::new(),
        pending: VecDeque::new(),
        body_done: false,
        finished: false,
    };

    let fragments = stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            // First, drain complete lines already buffered
            let frame = match state.pending.pop_front() {
                Some(line) => state.parser.feed_line(&line),
                None if state.body_done => match state.parser.finish() {
                    Some(frame) => Some(frame),
                    None => return None,
                },
                None => None,
            };

            if let Some(frame) = frame {
                match decode_frame(&frame) {
                    FrameOutcome::Fragment(text) => return Some((Ok(text), state)),
                    FrameOutcome::Skip => {}
                    FrameOutcome::Done => return None,
                    FrameOutcome::Failed(e) => {
                        state.finished = true;
                        return Some((Err(e), state));
                    }
                }
            }

            if !state.pending.is_empty() || state.body_done {
                continue;
            }

            // Need more data from the body
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let lines = state.lines.push(&chunk);
                    state.pending.extend(lines);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(StreamError::Http(e.to_string())), state));
                }
                None => {
                    state.body_done = true;
                    if let Some(rest) = state.lines.finish() {
                        state.pending.push_back(rest);
                    }
                }
            }
        }
    });

    Box::pin(fragments)
}
