//! Wire types for the `streamGenerateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::StreamError;
use crate::models::{Message, MessageRole};

/// Request body for `streamGenerateContent`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One conversation turn
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

impl Content {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl GenerateContentRequest {
    /// Build a request from prior thread messages plus the new input.
    ///
    /// System messages and messages with empty content are skipped; the
    /// input becomes the final user turn.
    pub fn new(
        history: &[Message],
        input: &str,
        system_instruction: Option<&str>,
        thinking_budget: Option<u32>,
    ) -> Self {
        let mut contents: Vec<Content> = history
            .iter()
            .filter(|m| !m.content.is_empty())
            .filter_map(|m| match m.role {
                MessageRole::User => Some(Content::text("user", m.content.as_str())),
                MessageRole::Model => Some(Content::text("model", m.content.as_str())),
                MessageRole::System => None,
            })
            .collect();
        contents.push(Content::text("user", input));

        Self {
            contents,
            system_instruction: system_instruction.map(|text| SystemInstruction {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
            generation_config: thinking_budget.map(|budget| GenerationConfig {
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: budget,
                }),
            }),
        }
    }
}

/// One `data:` payload of the response stream
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Parts may carry non-text payloads; only `text` is read.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Error object returned by the API, in a stream chunk or an error body
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Top-level error body of a non-2xx response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ApiError,
}

impl GenerateContentChunk {
    /// Text of the first candidate, empty when it carries none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl From<ApiError> for StreamError {
    fn from(err: ApiError) -> Self {
        let code = err.status.or_else(|| err.code.map(|c| c.to_string()));
        StreamError::Backend {
            code,
            message: err.message,
        }
    }
}

/// Decode one `data:` payload into the text fragment it carries.
pub fn decode_chunk(data: &str) -> Result<String, StreamError> {
    let chunk: GenerateContentChunk = serde_json::from_str(data)?;
    if let Some(err) = chunk.error {
        return Err(err.into());
    }
    Ok(chunk.text())
}

/// Best-effort message for a non-2xx response body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ if body.trim().is_empty() => "Unknown error".to_string(),
        _ => body.trim().to_string(),
    }
}
