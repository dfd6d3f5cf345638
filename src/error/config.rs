//! Configuration error types.

use thiserror::Error;

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither `GEMINI_API_KEY` nor `API_KEY` is set
    #[error("GEMINI_API_KEY (or API_KEY) must be set")]
    MissingApiKey,

    /// Base URL is not an http(s) URL
    #[error("Invalid base URL '{0}': expected http:// or https:// URL")]
    InvalidUrl(String),

    /// Model name is empty
    #[error("Model name must not be empty")]
    EmptyModel,

    /// HTTP client could not be built (TLS backend init failure)
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// Tracing subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ConfigError::InvalidUrl("ftp://x".to_string()).to_string(),
            "Invalid base URL 'ftp://x': expected http:// or https:// URL"
        );
        assert!(ConfigError::MissingApiKey.to_string().contains("GEMINI_API_KEY"));
    }
}
