//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`KeyValueStore`] - Durable local key-value storage for the thread blob
//! - [`ChatStreamClient`] - Hosted model that streams reply fragments

pub mod chat;
pub mod storage;

pub use chat::{ChatStreamClient, FragmentStream};
pub use storage::KeyValueStore;
