//! Black-box tests for the request pipeline.
//!
//! A real axum stub API is spawned on an ephemeral port and the real client
//! is driven against it, so bearer attachment, query construction, error
//! mapping, the 401/refresh branch, and cancellation are all exercised over
//! actual HTTP.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use pharmadesk_auth::{AuthTokens, SessionStore, User};
use pharmadesk_client::{AuthClient, HttpClient, LoginPayload};
use pharmadesk_core::{ClientConfig, ClientError, Query, endpoints};

#[derive(Clone)]
struct AppState {
    refresh_calls: Arc<AtomicUsize>,
}

struct TestServer {
    base_url: String,
    refresh_calls: Arc<AtomicUsize>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        pharmadesk_observability::init();

        let refresh_calls = Arc::new(AtomicUsize::new(0));
        let state = AppState {
            refresh_calls: refresh_calls.clone(),
        };

        let app = Router::new()
            .route("/api/echo/headers", get(echo_headers))
            .route("/api/echo/query", get(echo_query))
            .route("/api/categories/:id/", delete(no_content))
            .route("/api/fail/validation", get(fail_validation))
            .route("/api/protected", get(protected))
            .route("/api/slow/unauthorized", get(slow_unauthorized))
            .route("/api/auth/jwt/refresh/", post(refresh))
            .route("/api/auth/login/", post(login))
            .route("/api/auth/logout/", post(logout))
            .route("/api/auth/users/me/", get(me))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            refresh_calls,
            handle,
        }
    }

    fn client(&self) -> Arc<HttpClient> {
        let session = Arc::new(SessionStore::in_memory());
        Arc::new(HttpClient::new(ClientConfig::new(&self.base_url), session).unwrap())
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stub handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "authorization": authorization }))
}

async fn echo_query(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "query": query.unwrap_or_default() }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fail_validation() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "detail": "validation failed",
            "name": ["This field is required."]
        })),
    )
}

/// Accepts only the refreshed access token, so the first call with a stale
/// token sees a 401 and the next call (after the silent refresh) succeeds.
async fn protected(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer refreshed-access") => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token expired" })),
        ),
    }
}

async fn slow_unauthorized() -> (StatusCode, Json<Value>) {
    tokio::time::sleep(Duration::from_secs(2)).await;
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Token expired" })),
    )
}

async fn refresh(State(state): State<AppState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body.get("refresh").and_then(Value::as_str) == Some("good-refresh") {
        (StatusCode::OK, Json(json!({ "access": "refreshed-access" })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "invalid refresh" })),
        )
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("password").and_then(Value::as_str) == Some("secret") {
        (
            StatusCode::OK,
            Json(json!({ "access": "initial-access", "refresh": "good-refresh" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "invalid credentials" })),
        )
    }
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "credentials not provided" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": Uuid::now_v7().to_string(),
            "username": "amina",
            "email": "amina@example.com",
            "role": 2,
            "role_name": "Pharmacist",
            "is_active": true,
            "is_staff": false,
            "created_at": "2025-06-01T08:00:00Z",
            "permissions": ["view_medicine", "add_sale"]
        })),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn test_user() -> User {
    serde_json::from_value(json!({
        "id": Uuid::now_v7().to_string(),
        "username": "tester",
        "email": "tester@example.com",
        "is_active": true,
        "is_staff": false,
        "created_at": "2025-06-01T08:00:00Z",
        "permissions": []
    }))
    .unwrap()
}

fn establish_session(client: &HttpClient, access: &str, refresh: &str) {
    client
        .session()
        .login(test_user(), AuthTokens::new(access, refresh));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn attaches_bearer_token_when_authenticated() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    establish_session(&client, "token-abc", "refresh-abc");

    let echoed: Value = client
        .get("/api/echo/headers", &Query::new(), None)
        .await
        .unwrap();
    assert_eq!(echoed["authorization"], "Bearer token-abc");
}

#[tokio::test]
async fn sends_unauthenticated_without_tokens() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let echoed: Value = client
        .get("/api/echo/headers", &Query::new(), None)
        .await
        .unwrap();
    assert_eq!(echoed["authorization"], Value::Null);
}

#[tokio::test]
async fn empty_query_values_are_omitted() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let query = Query::new()
        .set("search", String::new())
        .set("ordering", "name".to_string())
        .set("page", None);

    let echoed: Value = client.get("/api/echo/query", &query, None).await.unwrap();
    assert_eq!(echoed["query"], "ordering=name");
}

#[tokio::test]
async fn no_content_resolves_to_empty_result() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let path = endpoints::detail(endpoints::CATEGORIES, Uuid::now_v7());
    client.delete::<()>(&path, None).await.unwrap();
}

#[tokio::test]
async fn error_record_carries_status_message_and_details() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let err = client
        .get::<Value>("/api/fail/validation", &Query::new(), None)
        .await
        .unwrap_err();

    let ClientError::Api { status, message, .. } = &err else {
        panic!("expected Api error, got {err:?}");
    };
    assert_eq!(*status, 400);
    assert_eq!(message, "validation failed");
    assert_eq!(
        err.field_errors()["name"],
        vec!["This field is required."]
    );
}

#[tokio::test]
async fn refresh_success_updates_token_without_retrying_the_caller() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    establish_session(&client, "initial-access", "good-refresh");

    // The triggering call still fails; the pipeline does not replay it.
    let err = client
        .get::<Value>("/api/protected", &Query::new(), None)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    // But the refresh ran once and corrected the stored access token.
    assert_eq!(srv.refresh_calls(), 1);
    assert_eq!(
        client.session().access_token().as_deref(),
        Some("refreshed-access")
    );
    assert!(client.session().is_authenticated());

    // The caller's next call goes out with the corrected token.
    let ok: Value = client
        .get("/api/protected", &Query::new(), None)
        .await
        .unwrap();
    assert_eq!(ok["status"], "ok");
    assert_eq!(srv.refresh_calls(), 1);
}

#[tokio::test]
async fn refresh_failure_clears_session_and_signals_expiry() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    establish_session(&client, "initial-access", "bad-refresh");

    let expired = client.session_expired();
    assert!(!*expired.borrow());

    let err = client
        .get::<Value>("/api/protected", &Query::new(), None)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    assert_eq!(srv.refresh_calls(), 1);
    assert!(!client.session().is_authenticated());
    assert!(client.session().user().is_none());
    assert!(client.session().tokens().is_none());
    assert!(client.session().permissions().is_empty());
    assert!(*expired.borrow());
}

#[tokio::test]
async fn no_refresh_attempt_without_refresh_token() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let err = client
        .get::<Value>("/api/protected", &Query::new(), None)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(srv.refresh_calls(), 0);
}

#[tokio::test]
async fn concurrent_unauthorized_calls_share_one_refresh() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    establish_session(&client, "initial-access", "good-refresh");

    let q = Query::new();
    let (a, b) = tokio::join!(
        client.get::<Value>("/api/protected", &q, None),
        client.get::<Value>("/api/protected", &q, None),
    );
    assert!(a.is_err());
    assert!(b.is_err());

    // Both calls went out with the same stale token; only one refresh runs.
    assert_eq!(srv.refresh_calls(), 1);
    assert_eq!(
        client.session().access_token().as_deref(),
        Some("refreshed-access")
    );
}

#[tokio::test]
async fn cancellation_suppresses_the_failure_path() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    establish_session(&client, "initial-access", "good-refresh");

    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = client
        .get::<Value>("/api/slow/unauthorized", &Query::new(), Some(&token))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(1));

    // The endpoint would have answered 401; a cancelled call must not
    // refresh, log out, or signal expiry.
    assert_eq!(srv.refresh_calls(), 0);
    assert!(client.session().is_authenticated());
    assert!(!*client.session_expired().borrow());
}

#[tokio::test]
async fn sign_in_establishes_the_session() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    let auth = AuthClient::new(client.clone());

    let user = auth
        .sign_in(&LoginPayload {
            email: "amina@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.username, "amina");
    assert!(client.session().is_authenticated());
    assert_eq!(
        client.session().access_token().as_deref(),
        Some("initial-access")
    );
    assert!(client.session().has_permission("view_medicine"));
    assert!(!client.session().has_permission("delete_user"));
}

#[tokio::test]
async fn sign_in_with_bad_credentials_leaves_session_empty() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    let auth = AuthClient::new(client.clone());

    let err = auth
        .sign_in(&LoginPayload {
            email: "amina@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn sign_out_clears_the_session() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    let auth = AuthClient::new(client.clone());

    auth.sign_in(&LoginPayload {
        email: "amina@example.com".to_string(),
        password: "secret".to_string(),
    })
    .await
    .unwrap();
    assert!(client.session().is_authenticated());

    auth.sign_out().await;
    assert!(!client.session().is_authenticated());
    assert!(client.session().permissions().is_empty());
}
