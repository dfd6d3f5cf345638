//! Thread management methods for ThreadStore

use crate::models::{new_id, Message, Thread};

use super::ThreadStore;

impl ThreadStore {
    /// Get all threads in order (most recent first)
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Get a thread by ID
    pub fn get_thread(&self, id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == id)
    }

    pub(crate) fn get_thread_mut(&mut self, id: &str) -> Option<&mut Thread> {
        self.threads.iter_mut().find(|t| t.id == id)
    }

    /// Get messages for a thread
    pub fn get_messages(&self, thread_id: &str) -> Option<&[Message]> {
        self.get_thread(thread_id).map(|t| t.messages.as_slice())
    }

    /// Get the number of threads
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Currently selected thread id, if any
    pub fn active_thread_id(&self) -> Option<&str> {
        self.active_thread_id.as_deref()
    }

    /// The selected thread, if the selection names an existing thread
    pub fn active_thread(&self) -> Option<&Thread> {
        self.active_thread_id
            .as_deref()
            .and_then(|id| self.get_thread(id))
    }

    /// Create a new empty thread at the front of the list and select it.
    ///
    /// Returns a copy of the created thread.
    pub fn create_thread(&mut self, title: impl Into<String>) -> Thread {
        let mut thread = Thread::new(title);

        // Ids must stay unique within the collection
        while self.get_thread(&thread.id).is_some() {
            thread.id = new_id();
        }

        self.active_thread_id = Some(thread.id.clone());
        self.threads.insert(0, thread.clone());
        thread
    }

    /// Remove a thread from the store.
    ///
    /// Other threads keep their relative order. If the removed thread was
    /// selected, the selection is cleared.
    ///
    /// Returns `true` if the thread existed and was removed, `false` otherwise.
    pub fn delete_thread(&mut self, thread_id: &str) -> bool {
        let before_len = self.threads.len();
        self.threads.retain(|t| t.id != thread_id);
        let removed = self.threads.len() < before_len;

        if self.active_thread_id.as_deref() == Some(thread_id) {
            self.active_thread_id = None;
        }

        removed
    }

    /// Select a thread. The id is not required to exist.
    pub fn select_thread(&mut self, thread_id: impl Into<String>) {
        self.active_thread_id = Some(thread_id.into());
    }

    /// Clear the selection without touching any thread
    pub fn clear_selection(&mut self) {
        self.active_thread_id = None;
    }
}
