// Integration tests for GeminiClient against a local mock server.

mod common;

use common::{gemini_body, gemini_chunk};
use futures::StreamExt;
use omnicore::adapters::GeminiClient;
use omnicore::config::GeminiConfig;
use omnicore::controller::{ChatController, SubmitOutcome, SubmitSource};
use omnicore::error::StreamError;
use omnicore::models::{Message, MessageRole};
use omnicore::traits::ChatStreamClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_PATH: &str = "/v1beta/models/gemini-3-flash-preview:streamGenerateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new("test-key")
        .with_base_url(server.uri())
        .with_system_instruction(Some("Be concise.".to_string()));
    GeminiClient::new(config).unwrap()
}

fn sse(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}

async fn collect(client: &GeminiClient, history: &[Message], input: &str) -> Vec<Result<String, StreamError>> {
    client
        .stream_chat(history, input)
        .await
        .unwrap()
        .collect()
        .await
}

#[tokio::test]
async fn test_streams_fragments_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(sse(gemini_body(&["Hel", "lo", " world"])))
        .expect(1)
        .mount(&server)
        .await;

    let items = collect(&client_for(&server), &[], "Hi").await;
    assert_eq!(
        items,
        vec![
            Ok("Hel".to_string()),
            Ok("lo".to_string()),
            Ok(" world".to_string())
        ]
    );
}

#[tokio::test]
async fn test_request_body_carries_history_instruction_and_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "Be concise."}]},
            "generationConfig": {"thinkingConfig": {"thinkingBudget": 0}}
        })))
        .respond_with(sse(gemini_body(&["ok"])))
        .mount(&server)
        .await;

    let history = vec![
        Message::new(MessageRole::User, "What is Rust?"),
        Message::new(MessageRole::Model, "A systems language."),
    ];
    let items = collect(&client_for(&server), &history, "And Go?").await;
    assert_eq!(items, vec![Ok("ok".to_string())]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["contents"],
        json!([
            {"role": "user", "parts": [{"text": "What is Rust?"}]},
            {"role": "model", "parts": [{"text": "A systems language."}]},
            {"role": "user", "parts": [{"text": "And Go?"}]}
        ])
    );
}

#[tokio::test]
async fn test_error_status_fails_to_open() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).stream_chat(&[], "Hi").await;
    match result {
        Err(StreamError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected the request to fail"),
    }
}

#[tokio::test]
async fn test_error_chunk_mid_stream() {
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {}\n\n{}",
        gemini_chunk("par"),
        json!({"error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}}),
        gemini_chunk("never")
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(sse(body))
        .mount(&server)
        .await;

    let items = collect(&client_for(&server), &[], "Hi").await;
    assert_eq!(
        items,
        vec![
            Ok("par".to_string()),
            Err(StreamError::Backend {
                code: Some("UNAVAILABLE".to_string()),
                message: "overloaded".to_string()
            })
        ]
    );
}

#[tokio::test]
async fn test_chunks_without_text_yield_empty_fragments() {
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {}\n\n",
        gemini_chunk("done"),
        json!({"candidates": [{"finishReason": "STOP"}], "usageMetadata": {"totalTokenCount": 12}})
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(sse(body))
        .mount(&server)
        .await;

    let items = collect(&client_for(&server), &[], "Hi").await;
    assert_eq!(items, vec![Ok("done".to_string()), Ok(String::new())]);
}

#[tokio::test]
async fn test_controller_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(sse(gemini_body(&["# Plan\n", "**Step** one"])))
        .mount(&server)
        .await;

    let controller = ChatController::in_memory(client_for(&server));
    controller.set_input("Build a plan");
    let outcome = controller.submit(SubmitSource::Input).await;

    let SubmitOutcome::Completed {
        thread_id,
        message_id,
    } = outcome
    else {
        panic!("expected completion");
    };
    let reply = controller.with_session(|s| {
        s.store()
            .get_thread(&thread_id)
            .and_then(|t| t.message(&message_id))
            .map(|m| m.content.clone())
    });
    assert_eq!(reply.as_deref(), Some("# Plan\n**Step** one"));
    assert_eq!(
        omnicore::markup::render_markup(reply.as_deref().unwrap_or_default()),
        "<h1>Plan</h1><br /><strong>Step</strong> one"
    );
}

#[tokio::test]
async fn test_missing_key_never_hits_network() {
    let server = MockServer::start().await;
    let config = GeminiConfig::default().with_base_url(server.uri());
    let client = GeminiClient::new(config).unwrap();

    assert!(matches!(
        client.stream_chat(&[], "Hi").await,
        Err(StreamError::MissingApiKey)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
