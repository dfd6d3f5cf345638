//! Tracing subscriber setup for hosts.
//!
//! The library only emits `tracing` events; hosts that want them printed call
//! [`init_tracing`] once at startup.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Environment variable holding the filter directives.
pub const LOG_ENV_VAR: &str = "OMNICORE_LOG";

/// Filter used when the environment sets none.
pub const DEFAULT_FILTER: &str = "info";

/// Where and how much to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// Filter directives; overrides `OMNICORE_LOG` when set
    pub filter: Option<String>,
    /// Append to this file instead of writing to stderr
    pub log_file: Option<PathBuf>,
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Resolve the filter: explicit value, then `OMNICORE_LOG`, then `info`.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        match &self.filter {
            Some(directives) => EnvFilter::try_new(directives)
                .map_err(|e| ConfigError::Telemetry(e.to_string())),
            None => Ok(EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }
}

/// Install the global `fmt` subscriber.
///
/// Fails if the filter is invalid, the log file cannot be opened, or a
/// global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), ConfigError> {
    let filter = config.env_filter()?;

    let result = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ConfigError::Telemetry(format!("{}: {}", path.display(), e)))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| ConfigError::Telemetry(e.to_string()))
}
