//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions,
//! enabling tests without network access or file system access.
//!
//! # Available Mocks
//!
//! - [`InMemoryKeyValueStore`] - In-memory storage with failure injection
//! - [`ScriptedChatClient`] - Replays fixed fragment scripts
//! - [`ChannelChatClient`] - Fragments pushed by the test

pub mod chat;
pub mod storage;

pub use chat::{ChannelChatClient, FragmentSender, RecordedCall, Script, ScriptedChatClient};
pub use storage::InMemoryKeyValueStore;
