//! Integration tests for live generation
//!
//! These tests use wiremock to stand in for the chat-completions service and
//! check the request shape, response handling and recent-line memory.

use generation::{GenerationClient, GenerationConfig, GenerationError, LineGenerator};
use serde_json::json;
use std::sync::Arc;
use storage::{MemoryRecordStore, RecordStore};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn completion(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "deepseek-chat",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

fn client_for(server: &MockServer, store: Arc<dyn RecordStore>) -> GenerationClient {
    let config = GenerationConfig::live("sk-test")
        .with_endpoint(format!("{}/chat/completions", server.uri()))
        .with_temperature(1.2)
        .with_top_p(0.9);
    GenerationClient::new(config, store).unwrap()
}

// =============================================================================
// Successful Request Tests
// =============================================================================

#[tokio::test]
async fn test_live_generation_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "stream": false,
            "messages": [{ "role": "system" }, { "role": "user" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Are you Wi-Fi? I feel a connection.\n")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    let line = client.generate("nerdy", "playful").await.unwrap();

    assert_eq!(line, "Are you Wi-Fi? I feel a connection.");
}

#[tokio::test]
async fn test_live_generation_sends_sampling_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi.")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    client.generate("smooth", "confident").await.unwrap();

    let requests: Vec<Request> = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!((body["temperature"].as_f64().unwrap() - 1.2).abs() < 1e-6);
    assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);

    let system = body["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("smooth"));
    assert!(system.contains("confident"));
}

#[tokio::test]
async fn test_live_generation_updates_history_and_prompts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("First line.")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Second line.")))
        .mount(&mock_server)
        .await;

    let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
    let client = client_for(&mock_server, store);

    client.generate("cheesy", "silly").await.unwrap();
    client.generate("cheesy", "silly").await.unwrap();

    assert_eq!(client.history().recent("cheesy"), vec!["Second line.", "First line."]);

    // The second prompt quotes the first result as something to avoid
    let requests = mock_server.received_requests().await.unwrap();
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    let user = second["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("- First line."));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_live_generation_non_success_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    let err = client.generate("funny", "playful").await.unwrap_err();

    match err {
        GenerationError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(client.history().recent("funny").is_empty());
}

#[tokio::test]
async fn test_live_generation_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    let err = client.generate("funny", "playful").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_live_generation_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    let err = client.generate("funny", "playful").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_live_generation_empty_choices() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    let err = client.generate("funny", "playful").await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[tokio::test]
async fn test_live_generation_blank_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   \n")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Arc::new(MemoryRecordStore::new()));
    let err = client.generate("sweet", "tender").await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
    assert!(client.history().recent("sweet").is_empty());
}
