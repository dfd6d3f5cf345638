//! Thread collection persistence.
//!
//! The whole collection is stored as one JSON array under a single key and
//! rewritten after every mutation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{StorageConfig, DEFAULT_STORAGE_KEY};
use crate::error::StorageError;
use crate::models::Thread;
use crate::traits::KeyValueStore;

/// Storage key the thread collection is saved under.
pub const STORAGE_KEY: &str = DEFAULT_STORAGE_KEY;

/// Loads and saves the thread collection through a [`KeyValueStore`].
#[derive(Clone)]
pub struct ThreadPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for ThreadPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl ThreadPersistence {
    /// Persist under the default key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Persist under the key named by `config`.
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &StorageConfig) -> Self {
        Self::with_key(store, config.storage_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored collection. A missing blob is an empty collection.
    pub fn load_threads(&self) -> Result<Vec<Thread>, StorageError> {
        match self.store.get(&self.key)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored collection.
    pub fn save_threads(&self, threads: &[Thread]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(threads)?;
        self.store.set(&self.key, &blob)
    }

    /// Load at startup; unreadable or corrupt data starts an empty store.
    pub fn load_or_empty(&self) -> Vec<Thread> {
        match self.load_threads() {
            Ok(threads) => {
                debug!(count = threads.len(), key = %self.key, "Loaded threads");
                threads
            }
            Err(e) => {
                warn!(error = %e, key = %self.key, "Failed to load threads, starting empty");
                Vec::new()
            }
        }
    }

    /// Save and log failures instead of returning them.
    pub fn save_or_log(&self, threads: &[Thread]) {
        if let Err(e) = self.save_threads(threads) {
            warn!(error = %e, key = %self.key, "Failed to persist threads");
        }
    }
}
