//! Streaming-related error types.
//!
//! Errors raised while opening or consuming a reply stream from the hosted
//! model.

use thiserror::Error;

/// Stream-specific error variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StreamError {
    /// Request could not be sent or the body stream broke.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Backend reported an error inside the stream.
    #[error("Backend error{}: {message}", code_suffix(.code))]
    Backend { code: Option<String>, message: String },

    /// Stream payload could not be decoded.
    #[error("Failed to parse stream data: {0}")]
    Parse(String),

    /// No API key configured for an endpoint that needs one.
    #[error("No API key configured")]
    MissingApiKey,

    /// Stream ended before the client could produce it (mock/test clients).
    #[error("Stream closed: {0}")]
    Closed(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" [{c}]")).unwrap_or_default()
}

impl StreamError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Http(_) => "E_STREAM_HTTP",
            StreamError::Status { .. } => "E_STREAM_STATUS",
            StreamError::Backend { .. } => "E_STREAM_BACKEND",
            StreamError::Parse(_) => "E_STREAM_PARSE",
            StreamError::MissingApiKey => "E_STREAM_AUTH",
            StreamError::Closed(_) => "E_STREAM_CLOSED",
        }
    }

    /// Whether the failure happened before any byte of the reply arrived.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            StreamError::Http(_) | StreamError::Status { .. } | StreamError::MissingApiKey
        )
    }
}

impl From<reqwest::Error> for StreamError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => StreamError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => StreamError::Http(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Parse(err.to_string())
    }
}
