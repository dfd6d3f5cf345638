//! In-memory key-value store for testing.
//!
//! Provides a store that keeps values in memory, suitable for testing
//! without file system access, with switches to make reads or writes fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StorageError;
use crate::traits::KeyValueStore;

/// In-memory key-value store.
///
/// Clones share the same underlying map, so a test can hand one clone to
/// the controller and inspect the other.
///
/// # Example
///
/// ```ignore
/// use omnicore::adapters::mock::InMemoryKeyValueStore;
/// use omnicore::traits::KeyValueStore;
///
/// let store = InMemoryKeyValueStore::new();
/// store.set("k", "v")?;
/// assert_eq!(store.get("k")?.as_deref(), Some("v"));
///
/// store.set_write_should_fail(true);
/// assert!(store.set("k", "w").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    read_should_fail: Arc<Mutex<bool>>,
    write_should_fail: Arc<Mutex<bool>>,
    write_count: Arc<Mutex<usize>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one value already present.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.lock_values().insert(key.to_string(), value.to_string());
        store
    }

    /// Configure whether reads should fail.
    pub fn set_read_should_fail(&self, should_fail: bool) {
        *lock(&self.read_should_fail) = should_fail;
    }

    /// Configure whether writes should fail.
    pub fn set_write_should_fail(&self, should_fail: bool) {
        *lock(&self.write_should_fail) = should_fail;
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        *lock(&self.write_count)
    }

    /// Raw stored value, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock_values().get(key).cloned()
    }

    fn lock_values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        lock(&self.values)
    }
}

// A poisoned lock only means another test thread panicked; the data is
// still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if *lock(&self.read_should_fail) {
            return Err(StorageError::Unavailable("simulated read failure".to_string()));
        }
        Ok(self.lock_values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *lock(&self.write_should_fail) {
            return Err(StorageError::Unavailable("simulated write failure".to_string()));
        }
        self.lock_values().insert(key.to_string(), value.to_string());
        *lock(&self.write_count) += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if *lock(&self.write_should_fail) {
            return Err(StorageError::Unavailable("simulated write failure".to_string()));
        }
        self.lock_values().remove(key);
        Ok(())
    }
}
