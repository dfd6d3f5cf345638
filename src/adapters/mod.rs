//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`GeminiClient`] - Streaming replies from the Gemini API via reqwest
//! - [`FileKeyValueStore`] - One JSON file per key under a data directory
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::InMemoryKeyValueStore`] - In-memory storage
//! - [`mock::ScriptedChatClient`] - Scripted fragment replies
//! - [`mock::ChannelChatClient`] - Test-driven fragment replies

pub mod file_storage;
pub mod gemini;
pub mod mock;

pub use file_storage::FileKeyValueStore;
pub use gemini::GeminiClient;
pub use mock::{ChannelChatClient, InMemoryKeyValueStore, ScriptedChatClient};
