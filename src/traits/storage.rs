//! Key-value storage trait abstraction.
//!
//! Mirrors the browser `localStorage` contract the thread collection was
//! designed around: string keys, string values, synchronous access.

use crate::error::StorageError;

/// Trait for durable local key-value storage.
///
/// Implementations include the file-backed store used in production and an
/// in-memory store for tests.
///
/// # Example
///
/// ```ignore
/// use omnicore::traits::KeyValueStore;
///
/// fn remember<S: KeyValueStore>(store: &S) -> Result<(), StorageError> {
///     store.set("greeting", "hello")?;
///     assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
///     Ok(())
/// }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if nothing is stored under the key
    /// - `Err(error)` if the backing store could not be read
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
