//! SSE (Server-Sent Events) stream parser
//!
//! Generic framing for the streaming endpoint. SSE format consists of:
//! - `event: <type>` - event type line
//! - `data: <json>` - data payload line(s)
//! - Empty line - signals end of event
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - Line and frame types (SseLine, SseFrame)
//! - `parser` - Stateful parsing (SseParser, LineBuffer, parse_sse_line)

mod events;
mod parser;

pub use events::{SseFrame, SseLine};
pub use parser::{parse_sse_line, LineBuffer, SseParser};
