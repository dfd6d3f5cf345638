//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```ignore
//! use omnicore::prelude::*;
//! ```

// Controller
pub use crate::controller::{
    ChatController, ChatSnapshot, RejectReason, StreamState, SubmitOutcome, SubmitSource,
    Suggestions,
};

// Model types
pub use crate::models::{Message, MessageRole, Thread};

// Store and persistence
pub use crate::persistence::ThreadPersistence;
pub use crate::store::ThreadStore;

// Adapters and traits
pub use crate::adapters::{FileKeyValueStore, GeminiClient};
pub use crate::traits::{ChatStreamClient, KeyValueStore};

// Configuration and errors
pub use crate::config::{GeminiConfig, StorageConfig};
pub use crate::error::{ConfigError, StorageError, StreamError};

// Rendering
pub use crate::markup::render_markup;
