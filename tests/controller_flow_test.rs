// Integration tests for the submit/stream flow of ChatController.
// These drive the controller through mock clients and check the store after
// each fragment, on failure, and when threads change mid-stream.

mod common;

use common::{message_content, persisted_controller, TEST_TIMEOUT};
use omnicore::adapters::mock::{ChannelChatClient, ScriptedChatClient};
use omnicore::controller::{
    ChatController, RejectReason, StreamState, SubmitOutcome, SubmitSource, Suggestions,
    FOLLOW_UP_PROMPTS,
};
use omnicore::error::StreamError;
use omnicore::models::MessageRole;
use omnicore::persistence::STORAGE_KEY;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_fragments_accumulate_as_prefixes() {
    let client = ChannelChatClient::new();
    let sender = client.prepare();
    let controller = ChatController::in_memory(client);
    let mut revisions = controller.subscribe();

    controller.set_input("Explain ownership");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();
    let _ = revisions.borrow_and_update();

    let driver = tokio::spawn({
        let controller = controller.clone();
        async move { controller.drive_reply(pending).await }
    });

    let snapshot = controller.snapshot();
    let (thread_id, message_id) = snapshot.pending_reply.clone().unwrap();

    let mut observed = Vec::new();
    for fragment in ["a", "bc", "", " d"] {
        assert!(sender.send(fragment));
        timeout(TEST_TIMEOUT, revisions.changed()).await.unwrap().unwrap();
        observed.push(message_content(&controller, &thread_id, &message_id).unwrap());
    }
    assert_eq!(observed, vec!["a", "abc", "abc", "abc d"]);
    assert_eq!(controller.state(), StreamState::Streaming);

    sender.finish();
    let outcome = timeout(TEST_TIMEOUT, driver).await.unwrap().unwrap();

    assert_eq!(
        outcome,
        SubmitOutcome::Completed {
            thread_id: thread_id.clone(),
            message_id: message_id.clone()
        }
    );
    assert_eq!(controller.state(), StreamState::Idle);
    assert_eq!(
        message_content(&controller, &thread_id, &message_id).as_deref(),
        Some("abc d")
    );
}

#[tokio::test]
async fn test_submission_appends_exactly_one_pair() {
    let client = ChannelChatClient::new();
    let _sender = client.prepare();
    let controller = ChatController::in_memory(client);

    controller.set_input("Hello");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, StreamState::Streaming);
    assert_eq!(snapshot.input, "");

    let thread = snapshot.active_thread().unwrap();
    assert_eq!(thread.title, "Hello");
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[0].role, MessageRole::User);
    assert_eq!(thread.messages[0].content, "Hello");
    assert_eq!(thread.messages[1].role, MessageRole::Model);
    assert_eq!(thread.messages[1].content, "");
    assert_eq!(thread.messages[1].id, pending.model_message_id);
    assert!(controller.is_pending_reply(&thread.id, &thread.messages[1].id));
}

#[tokio::test]
async fn test_submission_while_streaming_is_noop() {
    let client = ChannelChatClient::new();
    let sender = client.prepare();
    let controller = ChatController::in_memory(client);

    controller.set_input("first");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();

    controller.set_input("second");
    let before = controller.snapshot();

    let outcome = controller.submit(SubmitSource::Input).await;
    assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::Busy));

    let outcome = controller
        .submit(SubmitSource::Suggestion("Deep simulation".to_string()))
        .await;
    assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::Busy));

    assert_eq!(controller.snapshot(), before);
    assert_eq!(controller.new_thread(), Err(RejectReason::Busy));

    sender.finish();
    let outcome = controller.drive_reply(pending).await;
    assert!(outcome.is_completed());
    assert_eq!(controller.client().calls().len(), 1);
}

#[tokio::test]
async fn test_failure_keeps_partial_content_and_recovers() {
    let client = ScriptedChatClient::new()
        .with_failure_after(["par"], StreamError::Http("connection reset".to_string()))
        .with_reply(["fine"]);
    let (controller, _kv) = persisted_controller(client);

    controller.set_input("first");
    let outcome = controller.submit(SubmitSource::Input).await;

    let SubmitOutcome::Failed {
        thread_id,
        message_id,
        error,
    } = outcome
    else {
        panic!("expected failure");
    };
    assert_eq!(error, StreamError::Http("connection reset".to_string()));
    assert_eq!(
        message_content(&controller, &thread_id, &message_id).as_deref(),
        Some("par")
    );
    assert_eq!(controller.state(), StreamState::Idle);

    controller.set_input("second");
    let outcome = controller.submit(SubmitSource::Input).await;
    assert!(outcome.is_completed());

    let snapshot = controller.snapshot();
    let thread = snapshot.active_thread().unwrap();
    assert_eq!(thread.messages.len(), 4);
    assert_eq!(thread.messages[1].content, "par");
    assert_eq!(thread.messages[3].content, "fine");
}

#[tokio::test]
async fn test_open_failure_leaves_empty_reply() {
    let client = ScriptedChatClient::new().with_open_error(StreamError::Status {
        status: 503,
        message: "unavailable".to_string(),
    });
    let controller = ChatController::in_memory(client);

    let outcome = controller
        .submit(SubmitSource::Suggestion("Risk redirection".to_string()))
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            error: StreamError::Status { status: 503, .. },
            ..
        }
    ));
    let snapshot = controller.snapshot();
    let thread = snapshot.active_thread().unwrap();
    assert_eq!(thread.messages[1].content, "");
    assert_eq!(snapshot.state, StreamState::Idle);
}

#[tokio::test]
async fn test_dropped_submission_returns_to_idle() {
    let client = ChannelChatClient::new();
    let stalled = client.prepare();
    let (controller, kv) = persisted_controller(client);

    assert!(stalled.send("par"));
    controller.set_input("first");
    let result = timeout(
        Duration::from_millis(50),
        controller.submit(SubmitSource::Input),
    )
    .await;
    assert!(result.is_err());

    assert_eq!(controller.state(), StreamState::Idle);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.pending_reply, None);
    let thread = snapshot.active_thread().unwrap();
    assert_eq!(thread.messages[1].content, "par");
    assert!(kv.raw(STORAGE_KEY).unwrap().contains("\"par\""));

    let next = controller.client().prepare();
    next.send("second reply");
    next.finish();
    controller.set_input("second");
    let outcome = timeout(TEST_TIMEOUT, controller.submit(SubmitSource::Input))
        .await
        .unwrap();
    assert!(outcome.is_completed());
    assert!(controller.new_thread().is_ok());
}

#[tokio::test]
async fn test_aborted_driver_task_returns_to_idle() {
    let client = ChannelChatClient::new();
    let _stalled = client.prepare();
    let controller = ChatController::in_memory(client);
    let mut revisions = controller.subscribe();

    controller.set_input("hang");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();
    let driver = tokio::spawn({
        let controller = controller.clone();
        async move { controller.drive_reply(pending).await }
    });
    // Wait until the driver is parked on the open stream
    timeout(TEST_TIMEOUT, async {
        while controller.client().calls().is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    let _ = revisions.borrow_and_update();
    driver.abort();
    assert!(driver.await.unwrap_err().is_cancelled());

    timeout(TEST_TIMEOUT, revisions.changed()).await.unwrap().unwrap();
    assert_eq!(controller.state(), StreamState::Idle);
}

#[tokio::test]
async fn test_history_excludes_new_pair() {
    let client = ScriptedChatClient::new()
        .with_reply(["one"])
        .with_reply(["two"]);
    let controller = ChatController::in_memory(client);

    controller.set_input("first question");
    controller.submit(SubmitSource::Input).await;
    controller.set_input("second question");
    controller.submit(SubmitSource::Input).await;

    let calls = controller.client().calls();
    assert_eq!(calls.len(), 2);

    assert!(calls[0].history.is_empty());
    assert_eq!(calls[0].input, "first question");

    assert_eq!(calls[1].input, "second question");
    let history: Vec<_> = calls[1]
        .history
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        history,
        vec![
            (MessageRole::User, "first question"),
            (MessageRole::Model, "one")
        ]
    );
}

#[tokio::test]
async fn test_suggestion_leaves_input_untouched() {
    let client = ScriptedChatClient::new().with_reply(["ok"]);
    let controller = ChatController::in_memory(client);

    controller.set_input("half-typed draft");
    let outcome = controller
        .submit(SubmitSource::Suggestion("Innovation paths".to_string()))
        .await;

    assert!(outcome.is_completed());
    assert_eq!(controller.input(), "half-typed draft");
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.active_thread().unwrap().title, "Innovation paths");
}

#[tokio::test]
async fn test_deleting_streaming_thread_drops_updates() {
    let client = ChannelChatClient::new();
    let sender = client.prepare();
    let (controller, kv) = persisted_controller(client);

    controller.set_input("doomed");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();
    let thread_id = pending.thread_id.clone();

    let driver = tokio::spawn({
        let controller = controller.clone();
        async move { controller.drive_reply(pending).await }
    });

    assert!(controller.delete_thread(&thread_id));
    assert_eq!(controller.snapshot().active_thread_id, None);

    sender.send("ignored");
    sender.finish();
    let outcome = timeout(TEST_TIMEOUT, driver).await.unwrap().unwrap();

    assert!(outcome.is_completed());
    assert!(controller.snapshot().threads.is_empty());
    assert_eq!(controller.state(), StreamState::Idle);
    assert_eq!(kv.raw(STORAGE_KEY).as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_switching_threads_does_not_retarget_stream() {
    let client = ChannelChatClient::new();
    let sender = client.prepare();
    let controller = ChatController::in_memory(client);

    let other = controller.new_thread().unwrap();
    controller.select_thread("missing");
    controller.set_input("streaming here");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();
    assert_ne!(pending.thread_id, other.id);

    let driver = tokio::spawn({
        let controller = controller.clone();
        async move { controller.drive_reply(pending).await }
    });

    controller.select_thread(other.id.clone());
    sender.send("reply");
    sender.finish();
    let outcome = timeout(TEST_TIMEOUT, driver).await.unwrap().unwrap();

    let SubmitOutcome::Completed {
        thread_id,
        message_id,
    } = outcome
    else {
        panic!("expected completion");
    };
    assert_eq!(
        message_content(&controller, &thread_id, &message_id).as_deref(),
        Some("reply")
    );
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.active_thread_id.as_deref(), Some(other.id.as_str()));
    assert!(snapshot.active_thread().unwrap().messages.is_empty());
}

#[tokio::test]
async fn test_suggestions_follow_conversation_state() {
    let client = ChannelChatClient::new();
    let sender = client.prepare();
    let controller = ChatController::in_memory(client);

    assert!(matches!(controller.suggestions(), Suggestions::Starters(_)));

    controller.set_input("hi");
    let pending = controller.start_submit(SubmitSource::Input).unwrap();
    assert_eq!(controller.suggestions(), Suggestions::None);

    sender.send("hello");
    sender.finish();
    controller.drive_reply(pending).await;

    assert_eq!(controller.suggestions().prompts(), &FOLLOW_UP_PROMPTS);
}

#[tokio::test]
async fn test_restart_restores_threads() {
    let client = ScriptedChatClient::new().with_reply(["stored ", "reply"]);
    let (controller, kv) = persisted_controller(client);

    controller.set_input("remember this");
    controller.submit(SubmitSource::Input).await;
    let before = controller.snapshot().threads;

    let persistence = omnicore::persistence::ThreadPersistence::new(std::sync::Arc::new(kv));
    let restarted = ChatController::new(ScriptedChatClient::new(), persistence);
    let snapshot = restarted.snapshot();

    assert_eq!(snapshot.threads, before);
    assert_eq!(snapshot.active_thread_id, None);
    assert_eq!(snapshot.threads[0].messages[1].content, "stored reply");
}
