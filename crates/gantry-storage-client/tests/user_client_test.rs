//! Contract tests for UserClient: membership listings, token resolution,
//! and token management.

use gantry_core::{RelationshipStatus, UserName};
use gantry_storage_client::{RequestId, StorageClient, StorageConfig};
use wiremock::matchers::{body_json, header, method, path, query_param};
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

// ── GET /v1/users/user/{user}/memberships ────────────────────────────

#[tokio::test]
async fn memberships_filters_by_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/user/alice/memberships"))
        .and(query_param("status", "pending"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objects": ["birds@legacy"],
            "next": false,
            "prev": false,
            "total": 1,
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let user = UserName::new("alice").unwrap();
    let page = client
        .users()
        .memberships(&RequestId::generate(), &user, RelationshipStatus::Pending, 0)
        .await
        .unwrap();
    assert_eq!(page.objects, vec!["birds@legacy"]);
}

// ── GET /v1/users/token ──────────────────────────────────────────────

#[tokio::test]
async fn by_token_sends_token_header_and_returns_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/token"))
        .and(header("token", "s3kr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "name": "alice", "email": "alice@example.com" },
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let user = client
        .users()
        .by_token(&RequestId::generate(), "s3kr3t")
        .await
        .unwrap();
    assert_eq!(user.name.as_str(), "alice");
    assert_eq!(user.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn unknown_token_carries_www_authenticate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("www-authenticate", "Bearer")
                .set_body_json(serde_json::json!({ "message": "Unauthenticated" })),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .users()
        .by_token(&RequestId::generate(), "wrong")
        .await
        .unwrap_err();

    let failure = err.remote().unwrap();
    assert_eq!(failure.status, 401);
    assert_eq!(failure.message, "Unauthenticated");
    // No code in the body: the sentinel applies.
    assert_eq!(failure.code, "unknown");
    assert_eq!(failure.headers.get("www-authenticate").unwrap(), "Bearer");
}

// ── POST /v1/users/tokens ────────────────────────────────────────────

#[tokio::test]
async fn create_token_returns_value_exactly_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/users/tokens"))
        .and(header("bearer", "alice"))
        .and(body_json(serde_json::json!({ "description": "laptop" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "value": "gantry-token-1",
            "value_hash": "deadbeef",
            "description": "laptop",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let bearer = UserName::new("alice").unwrap();
    let grant = client
        .users()
        .create_token(&RequestId::generate(), &bearer, "laptop")
        .await
        .unwrap();
    assert_eq!(grant.value, "gantry-token-1");
    assert_eq!(grant.value_hash, "deadbeef");
}

// ── GET /v1/users/tokens ─────────────────────────────────────────────

#[tokio::test]
async fn tokens_lists_descriptions_without_values() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/tokens"))
        .and(header("bearer", "alice"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objects": [{
                "value_hash": "deadbeef",
                "description": "laptop",
                "created": "2026-03-01T12:00:00Z",
            }],
            "next": false,
            "prev": false,
            "total": 1,
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let bearer = UserName::new("alice").unwrap();
    let page = client
        .users()
        .tokens(&RequestId::generate(), &bearer, 0)
        .await
        .unwrap();
    assert_eq!(page.objects.len(), 1);
    assert_eq!(page.objects[0].value_hash, "deadbeef");
}

// ── DELETE /v1/users/tokens/token/{hashes} ───────────────────────────

#[tokio::test]
async fn delete_tokens_joins_hashes_with_semicolons() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/users/tokens/token/aaa;bbb"))
        .and(header("bearer", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "removed": 2,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let bearer = UserName::new("alice").unwrap();
    let removed = client
        .users()
        .delete_tokens(
            &RequestId::generate(),
            &bearer,
            &["aaa".to_string(), "bbb".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(removed.removed, 2);
}
