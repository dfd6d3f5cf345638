//! Error types for omnicore.
//!
//! Each concern has its own error enum:
//!
//! | Type | Raised by | Fatal |
//! |------|-----------|-------|
//! | [`StreamError`] | streaming clients, SSE parsing | No, the controller returns to idle |
//! | [`StorageError`] | key-value stores, persistence | No, logged and skipped |
//! | [`ConfigError`] | configuration validation | Yes, at construction time |

mod config;
mod storage;
mod stream;

pub use config::ConfigError;
pub use storage::StorageError;
pub use stream::StreamError;
