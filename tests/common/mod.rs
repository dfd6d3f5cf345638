//! Common test utilities for integration tests.
//!
//! Fixtures for building controllers over mock clients and in-memory
//! storage, and for writing Gemini SSE bodies.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use omnicore::adapters::mock::InMemoryKeyValueStore;
use omnicore::controller::ChatController;
use omnicore::persistence::ThreadPersistence;
use omnicore::traits::ChatStreamClient;

/// Upper bound for any await in a test, so a broken stream fails instead of
/// hanging the suite.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Controller persisting to an in-memory store the test can inspect.
pub fn persisted_controller<C: ChatStreamClient>(client: C) -> (ChatController<C>, InMemoryKeyValueStore) {
    let kv = InMemoryKeyValueStore::new();
    let persistence = ThreadPersistence::new(Arc::new(kv.clone()));
    (ChatController::new(client, persistence), kv)
}

/// Current content of a message, or `None` if it (or its thread) is gone.
pub fn message_content<C: ChatStreamClient>(
    controller: &ChatController<C>,
    thread_id: &str,
    message_id: &str,
) -> Option<String> {
    controller.with_session(|session| {
        session
            .store()
            .get_thread(thread_id)
            .and_then(|t| t.message(message_id))
            .map(|m| m.content.clone())
    })
}

/// One SSE event carrying a Gemini chunk with the given text.
pub fn gemini_chunk(text: &str) -> String {
    format!(
        "data: {}\r\n\r\n",
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]}
            }]
        })
    )
}

/// SSE body made of one chunk per fragment.
pub fn gemini_body(fragments: &[&str]) -> String {
    fragments.iter().map(|f| gemini_chunk(f)).collect()
}
