//! In-memory thread store
//!
//! Holds the thread collection (most recent first) and the active selection.
//! It is the single source of truth the UI renders from; every mutation leaves
//! the collection consistent for immediate persistence.

mod message;
mod thread;

pub use message::AppendedPair;

use crate::models::Thread;

/// Thread collection plus the active thread selection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ThreadStore {
    /// Threads in display order (most recently created first)
    pub(crate) threads: Vec<Thread>,
    /// Currently selected thread, which need not exist in `threads`
    pub(crate) active_thread_id: Option<String>,
}

impl ThreadStore {
    /// Create a new empty ThreadStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a previously persisted collection.
    ///
    /// Nothing is selected after loading.
    pub fn from_threads(threads: Vec<Thread>) -> Self {
        Self {
            threads,
            active_thread_id: None,
        }
    }

    /// Consume the store, returning the thread collection
    pub fn into_threads(self) -> Vec<Thread> {
        self.threads
    }

    /// Clear all threads and the selection
    pub fn clear(&mut self) {
        self.threads.clear();
        self.active_thread_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_is_empty() {
        let store = ThreadStore::new();
        assert_eq!(store.thread_count(), 0);
        assert!(store.threads().is_empty());
        assert!(store.active_thread_id().is_none());
    }

    #[test]
    fn test_from_threads_keeps_order_and_selects_nothing() {
        let threads = vec![Thread::new("first"), Thread::new("second")];
        let ids: Vec<String> = threads.iter().map(|t| t.id.clone()).collect();

        let store = ThreadStore::from_threads(threads);

        let loaded: Vec<&str> = store.threads().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(loaded, vec![ids[0].as_str(), ids[1].as_str()]);
        assert!(store.active_thread_id().is_none());
    }

    #[test]
    fn test_clear() {
        let mut store = ThreadStore::new();
        store.create_thread("a");
        store.create_thread("b");
        assert_eq!(store.thread_count(), 2);

        store.clear();

        assert_eq!(store.thread_count(), 0);
        assert!(store.active_thread_id().is_none());
    }
}
