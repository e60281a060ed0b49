//! Contract tests for SessionClient: the CLI login session lifecycle.

use gantry_storage_client::{RequestId, StorageClient, StorageConfig};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> StorageClient {
    let config = StorageConfig {
        base_url: mock_server.uri().parse().unwrap(),
        timeout_secs: 5,
        agent: "gantry".to_string(),
        hostname: "localhost".to_string(),
    };
    StorageClient::new(config).unwrap()
}

// ── POST /v1/cli-sessions ────────────────────────────────────────────

#[tokio::test]
async fn create_starts_a_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/cli-sessions"))
        .and(body_json(serde_json::json!({ "description": "cli login" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "session": "sess-1",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let session = client
        .sessions()
        .create(&RequestId::generate(), "cli login")
        .await
        .unwrap();
    assert_eq!(session.session, "sess-1");
}

// ── GET /v1/cli-sessions/session/{session} ───────────────────────────

#[tokio::test]
async fn fetch_reports_waiting_sessions_as_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/cli-sessions/session/sess-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": null,
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let value = client
        .sessions()
        .fetch(&RequestId::generate(), "sess-1")
        .await
        .unwrap();
    assert!(value.value.is_none());
}

#[tokio::test]
async fn fetch_returns_resolved_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/cli-sessions/session/sess-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": "gantry-token-1",
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let value = client
        .sessions()
        .fetch(&RequestId::generate(), "sess-1")
        .await
        .unwrap();
    assert_eq!(value.value.as_deref(), Some("gantry-token-1"));
}

#[tokio::test]
async fn fetch_of_consumed_session_is_a_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/cli-sessions/session/sess-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "no such session",
            "code": "session.dne",
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .sessions()
        .fetch(&RequestId::generate(), "sess-1")
        .await
        .unwrap_err();
    assert_eq!(err.remote().unwrap().code, "session.dne");
}

// ── POST /v1/cli-sessions/session/{session} ──────────────────────────

#[tokio::test]
async fn resolve_posts_the_token_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/cli-sessions/session/sess-1"))
        .and(body_json(serde_json::json!({ "value": "gantry-token-1" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client
        .sessions()
        .resolve(&RequestId::generate(), "sess-1", "gantry-token-1")
        .await
        .unwrap();
}
