//! Runtime configuration for the hosted model and local storage.
//!
//! Both configs use the builder pattern and can be seeded from the
//! environment.
//!
//! # Example
//!
//! ```ignore
//! use omnicore::config::GeminiConfig;
//!
//! let config = GeminiConfig::from_env()
//!     .with_model("gemini-2.5-flash")
//!     .with_thinking_budget(None);
//! config.validate()?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default model for replies.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Persona sent as the system instruction unless overridden.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Core identity: Omni-Core v4.0, a civilization-scale \
general intelligence core. Fuse knowledge across technology, finance, medicine, law, engineering, \
art and strategy, dropping outdated information before answering. Give executable steps, not only \
plans, and warn about second-order effects. Tailor answers to the user's thinking style and point \
out blind spots. Label each reply with the knowledge dimensions applied. Strategic analysis must \
cover the current trajectory, a restructuring proposal and potential second-order effects. \
Answer precisely and fast.";

/// Default connect timeout for the HTTP client.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default data subdirectory under the platform data dir.
pub const DATA_DIR_NAME: &str = "omnicore";

/// Storage key for the thread collection blob.
pub const DEFAULT_STORAGE_KEY: &str = "omni_core_threads";

/// Configuration for the Gemini streaming client.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key` (empty means unset)
    pub api_key: String,
    /// Model name, e.g. `gemini-3-flash-preview`
    pub model: String,
    /// API host without trailing slash
    pub base_url: String,
    /// System instruction text; `None` sends no instruction
    pub system_instruction: Option<String>,
    /// Thinking budget; `Some(0)` disables extended reasoning, `None` omits it
    pub thinking_budget: Option<u32>,
    /// Connection setup timeout (does not bound the stream)
    pub connect_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            system_instruction: Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            thinking_budget: Some(0),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::default().with_api_key(api_key)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API host. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_system_instruction(mut self, instruction: Option<String>) -> Self {
        self.system_instruction = instruction;
        self
    }

    pub fn with_thinking_budget(mut self, budget: Option<u32>) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Create config from the environment.
    ///
    /// Reads `GEMINI_API_KEY` (falling back to `API_KEY`), `GEMINI_MODEL` and
    /// `GEMINI_BASE_URL`. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(key) = env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("API_KEY")) {
            config = config.with_api_key(key);
        }
        if let Some(model) = env_non_empty("GEMINI_MODEL") {
            config = config.with_model(model);
        }
        if let Some(url) = env_non_empty("GEMINI_BASE_URL") {
            config = config.with_base_url(url);
        }

        config
    }

    /// Check that the config can be used to open a stream.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.base_url.clone()));
        }
        Ok(())
    }

    /// Full URL of the streaming endpoint.
    pub fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }
}

/// Where the thread collection is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME);
        Self {
            data_dir,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Create config from environment variable OMNICORE_DATA_DIR.
    pub fn from_env() -> Self {
        match env_non_empty("OMNICORE_DATA_DIR") {
            Some(dir) => Self::default().with_data_dir(dir),
            None => Self::default(),
        }
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
