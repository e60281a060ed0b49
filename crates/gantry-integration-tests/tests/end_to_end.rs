//! End-to-end scenarios: the registry app driven against a storage stub
//! listening on an ephemeral port. The gateway router is exercised in
//! process with `oneshot`, but every storage hop is a real HTTP request
//! through the typed client, so these tests cover the full path: route →
//! validation → client → wire → stub tables → translation → envelope.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use gantry_core::{Namespace, PackageRef, UserName};
use gantry_registry::state::{AppConfig, AppState};
use gantry_storage_client::{StorageClient, StorageConfig};
use gantry_storage_stub::{StubConfig, StubState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn user(name: &str) -> UserName {
    UserName::new(name).unwrap()
}

fn ns(spec: &str) -> Namespace {
    Namespace::parse(spec).unwrap()
}

fn pkg(spec: &str) -> PackageRef {
    PackageRef::parse(spec).unwrap()
}

/// A registry app wired to a freshly spawned storage stub.
///
/// Dropping the harness drops the shutdown sender, which stops the stub.
struct Harness {
    gateway: Router,
    storage: StubState,
    token: String,
    _shutdown: tokio::sync::oneshot::Sender<()>,
}

impl Harness {
    fn authed(&self, method: &str, uri: &str) -> Request<Body> {
        self.authed_as(method, uri, &self.token)
    }

    fn authed_as(&self, method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn authed_json(&self, method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Mint a token for bob so he can act as himself.
    fn bob_token(&self) -> String {
        self.storage
            .create_token(&user("bob"), "end-to-end")
            .unwrap()
            .value
    }
}

/// Spawn the stub on an ephemeral port, seed alice (owner of acme@github)
/// and bob, and point a registry app at it.
async fn harness() -> Harness {
    let storage = StubState::new(&StubConfig {
        port: 0,
        per_page: 100,
        default_host: "github".to_string(),
    });
    storage.seed_user(&user("alice"), None);
    storage.seed_user(&user("bob"), None);
    storage.seed_namespace(&ns("acme@github"), &user("alice"));
    let token = storage
        .create_token(&user("alice"), "end-to-end")
        .unwrap()
        .value;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let app = gantry_storage_stub::router(storage.clone());
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
            .ok();
    });

    let client = StorageClient::new(StorageConfig::local(port).unwrap()).unwrap();
    let gateway = gantry_registry::app(AppState::new(client, AppConfig::default()));

    Harness {
        gateway,
        storage,
        token,
        _shutdown: tx,
    }
}

async fn body_value(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn readiness_round_trips_the_live_stub() {
    let h = harness().await;
    let response = h
        .gateway
        .clone()
        .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_value(response).await["status"], "ready");
}

#[tokio::test]
async fn maintainer_invitation_flows_through_live_storage() {
    let h = harness().await;
    h.storage
        .seed_package(&pkg("acme@github/widget"), &ns("acme@github"), &user("alice"));

    let response = h
        .gateway
        .clone()
        .oneshot(h.authed(
            "POST",
            "/v1/packages/package/acme@github/widget/maintainers/bob",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_value(response).await["message"],
        "bob invited to join the maintainers of acme@github/widget."
    );

    // bob accepts on behalf of his personal namespace.
    let bob = h.bob_token();
    let response = h
        .gateway
        .clone()
        .oneshot(h.authed_as(
            "POST",
            "/v1/packages/package/acme@github/widget/invitation/bob",
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_value(response).await["message"],
        "bob is now a maintainer for acme@github/widget"
    );

    // The active maintainer listing now names both namespaces.
    let response = h
        .gateway
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/packages/package/acme@github/widget/maintainers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_value(response).await["objects"],
        json!(["acme@github", "bob@github"])
    );
}

#[tokio::test]
async fn conflicting_invitations_keep_the_storage_status() {
    let h = harness().await;
    h.storage
        .seed_package(&pkg("acme@github/widget"), &ns("acme@github"), &user("alice"));

    let invite = || {
        h.authed(
            "POST",
            "/v1/packages/package/acme@github/widget/maintainers/bob",
        )
    };
    let response = h.gateway.clone().oneshot(invite()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bob = h.bob_token();
    let response = h
        .gateway
        .clone()
        .oneshot(h.authed_as(
            "POST",
            "/v1/packages/package/acme@github/widget/invitation/bob",
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second invite finds the maintainership already active.
    let response = h.gateway.clone().oneshot(invite()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_value(response).await;
    assert_eq!(body["message"], "Namespace \"bob\" is already a member.");
    assert_eq!(body["code"], "maintainer.invite.already_accepted");
}

#[tokio::test]
async fn namespace_listing_pages_with_trimmed_windows() {
    let h = harness().await;
    for i in 0..301 {
        h.storage
            .seed_namespace(&ns(&format!("crate-{i:03}@github")), &user("alice"));
    }

    // 304 namespaces total; the third page holds exactly one window.
    let response = h
        .gateway
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/namespaces?page=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_value(response).await;
    assert_eq!(page["objects"].as_array().unwrap().len(), 100);
    assert_eq!(page["next"], true);
    assert_eq!(page["prev"], true);
    assert_eq!(page["total"], 304);
}

#[tokio::test]
async fn syncing_packages_report_retry_after_until_published() {
    let h = harness().await;

    // Create the package through the gateway; creation leaves it syncing.
    let response = h
        .gateway
        .clone()
        .oneshot(h.authed_json(
            "PUT",
            "/v1/packages/package/acme@github/widget",
            json!({ "require_tfa": false }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_value(response).await["syncing"], true);

    let get_package = || {
        Request::builder()
            .uri("/v1/packages/package/acme@github/widget")
            .body(Body::empty())
            .unwrap()
    };
    let response = h.gateway.clone().oneshot(get_package()).await.unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(response.headers()[header::RETRY_AFTER], "1");
    assert_eq!(body_value(response).await, json!({}));

    // The first published version flips the flag.
    let publish = Request::builder()
        .method("PUT")
        .uri("/v1/packages/package/acme@github/widget/versions/1.0.0")
        .header(header::AUTHORIZATION, format!("Bearer {}", h.token))
        .header(header::CONTENT_TYPE, "application/x-tar")
        .body(Body::from("tarball-bytes"))
        .unwrap();
    let response = h.gateway.clone().oneshot(publish).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_value(response).await["version"], "1.0.0");

    let response = h.gateway.clone().oneshot(get_package()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_value(response).await["syncing"], false);
}

#[tokio::test]
async fn published_artifacts_are_fetchable_by_digest() {
    let h = harness().await;
    h.storage
        .seed_package(&pkg("acme@github/widget"), &ns("acme@github"), &user("alice"));

    let publish = Request::builder()
        .method("PUT")
        .uri("/v1/packages/package/acme@github/widget/versions/1.0.0")
        .header(header::AUTHORIZATION, format!("Bearer {}", h.token))
        .header(header::CONTENT_TYPE, "application/x-tar")
        .body(Body::from("artifact-bytes"))
        .unwrap();
    let response = h.gateway.clone().oneshot(publish).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let object = body_value(response).await["object"]
        .as_str()
        .unwrap()
        .to_string();
    let digest = object.strip_prefix("sha512:").unwrap().to_string();

    // Object retrieval is public and relays the raw bytes.
    let response = h
        .gateway
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/v1/objects/object/sha512/{digest}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"artifact-bytes");
}

#[tokio::test]
async fn membership_walk_with_decline_and_reissue() {
    let h = harness().await;

    let response = h
        .gateway
        .clone()
        .oneshot(h.authed("POST", "/v1/namespaces/namespace/acme@github/members/bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_value(response).await["message"],
        "bob invited to join acme@github."
    );

    // bob declines, then alice invites again, then bob accepts.
    let bob = h.bob_token();
    let response = h
        .gateway
        .clone()
        .oneshot(h.authed_as(
            "DELETE",
            "/v1/namespaces/namespace/acme@github/members/invitation",
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_value(response).await["message"],
        "You have declined the invitation to join acme@github"
    );

    let response = h
        .gateway
        .clone()
        .oneshot(h.authed("POST", "/v1/namespaces/namespace/acme@github/members/bob"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = h
        .gateway
        .clone()
        .oneshot(h.authed_as(
            "POST",
            "/v1/namespaces/namespace/acme@github/members/invitation",
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_value(response).await["message"],
        "bob is now a member of acme@github"
    );

    // The public member listing reflects the active membership.
    let response = h
        .gateway
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/namespaces/namespace/acme@github/members")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        body_value(response).await["objects"],
        json!(["alice", "bob"])
    );
}

#[tokio::test]
async fn removing_a_missing_membership_names_the_invitee() {
    let h = harness().await;

    let remove = h.authed("DELETE", "/v1/namespaces/namespace/acme@github/members/bob");
    let response = h.gateway.clone().oneshot(remove).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_value(response).await;
    assert_eq!(
        body["message"],
        "\"bob\" is not a member of \"acme@github\" and has no pending invitation"
    );
    assert_eq!(body["code"], "member.invite.invitee_not_member");
}

#[tokio::test]
async fn anonymous_and_unknown_bearers_are_refused() {
    let h = harness().await;

    // No credentials at all.
    let response = h
        .gateway
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/namespaces/namespace/acme@github/members/bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_value(response).await["code"], "auth.required");

    // A token the stub has never issued.
    let response = h
        .gateway
        .clone()
        .oneshot(h.authed_as(
            "POST",
            "/v1/namespaces/namespace/acme@github/members/bob",
            "no-such-token",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_value(response).await["code"], "auth.required");

    // Public discovery still answers without credentials.
    let response = h
        .gateway
        .clone()
        .oneshot(Request::builder().uri("/v1/namespaces").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
