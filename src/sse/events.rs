//! SSE line and frame types

/// A single classified SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Event type declaration (e.g., "event: message")
    Event(String),
    /// Data payload (e.g., "data: {\"candidates\": []}")
    Data(String),
    /// Empty line - signals end of event
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
}

/// A complete SSE event: optional type plus joined data lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    pub event_type: Option<String>,
    pub data: String,
}

impl SseFrame {
    /// The `[DONE]` sentinel some providers send instead of closing the body.
    pub fn is_done_marker(&self) -> bool {
        self.data.trim() == "[DONE]"
    }
}
