use super::*;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};

// =============================================================================
// extract_token
// =============================================================================

#[test]
fn token_field_preferred() {
    let v = json!({ "token": "t1", "access_token": "t2", "detail": "t3" });
    assert_eq!(extract_token(&v).as_deref(), Some("t1"));
}

#[test]
fn access_token_used_when_token_absent() {
    let v = json!({ "access_token": "t2", "detail": "t3" });
    assert_eq!(extract_token(&v).as_deref(), Some("t2"));
}

#[test]
fn detail_is_last_resort() {
    let v = json!({ "detail": "t3" });
    assert_eq!(extract_token(&v).as_deref(), Some("t3"));
}

#[test]
fn empty_and_non_string_fields_skipped() {
    let v = json!({ "token": "", "access_token": 42, "detail": "t3" });
    assert_eq!(extract_token(&v).as_deref(), Some("t3"));
}

#[test]
fn no_token_fields_is_none() {
    assert!(extract_token(&json!({ "user": "a@b.c" })).is_none());
    assert!(extract_token(&json!("bare-string")).is_none());
}

// =============================================================================
// rejection_message
// =============================================================================

#[test]
fn rejection_uses_detail_for_json() {
    let msg = rejection_message("application/json", r#"{"detail":"Email already registered"}"#);
    assert_eq!(msg, "Email already registered");
}

#[test]
fn rejection_renders_structured_detail() {
    let msg = rejection_message("application/json", r#"{"detail":[{"msg":"field required"}]}"#);
    assert_eq!(msg, r#"[{"msg":"field required"}]"#);
}

#[test]
fn rejection_falls_back_to_body_without_detail() {
    let msg = rejection_message("application/json", r#"{"error":"boom"}"#);
    assert_eq!(msg, r#"{"error":"boom"}"#);
}

#[test]
fn rejection_ignores_json_for_text_content_type() {
    let msg = rejection_message("text/plain", r#"{"detail":"hidden"}"#);
    assert_eq!(msg, r#"{"detail":"hidden"}"#);
}

#[test]
fn rejection_truncates_long_bodies() {
    let body = "x".repeat(500);
    let msg = rejection_message("text/html", &body);
    assert_eq!(msg.chars().count(), ERROR_BODY_LIMIT);
}

#[test]
fn truncate_chars_respects_code_points() {
    assert_eq!(truncate_chars("ééé", 2), "éé");
    assert_eq!(truncate_chars("ab", 5), "ab");
    assert_eq!(truncate_chars("", 5), "");
}

// =============================================================================
// HttpBackend against a local stub service
// =============================================================================

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_owned()
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .route(
            "/signup",
            post(|axum::Json(body): axum::Json<Value>| async move {
                if body["email"] == "taken@example.test" {
                    (StatusCode::BAD_REQUEST, axum::Json(json!({ "detail": "Email already registered" })))
                } else {
                    (StatusCode::CREATED, axum::Json(json!({ "ok": true })))
                }
            }),
        )
        .route(
            "/login",
            post(|axum::Json(body): axum::Json<Value>| async move {
                if body["password"] == "secret" {
                    (StatusCode::OK, axum::Json(json!({ "access_token": "tok-123" })))
                } else {
                    (StatusCode::UNAUTHORIZED, axum::Json(json!({ "detail": "Invalid credentials" })))
                }
            }),
        )
        .route(
            "/generate",
            post(|headers: HeaderMap, axum::Json(body): axum::Json<Value>| async move {
                axum::Json(json!({
                    "PRD": format!("PRD for {}", body["brief"].as_str().unwrap_or_default()),
                    "Landing Page": format!("depth {}", body["depth"]),
                    "FAQ": bearer(&headers),
                    "Video Script": "script",
                }))
            }),
        )
        .route(
            "/history",
            get(|headers: HeaderMap| async move {
                axum::Json(json!([
                    { "id": 2, "brief": bearer(&headers), "created_at": "2024-05-02", "documents": {} },
                    { "id": 1, "brief": "older", "created_at": "2024-05-01", "documents": {} }
                ]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn stub_round_trip() {
    let base = spawn_stub().await;
    let backend = HttpBackend::new(&base, BackendTimeouts::default()).unwrap();
    assert!(!backend.base_url().ends_with('/'));

    assert!(backend.health().await);

    backend.signup("new@example.test", "pw").await.unwrap();
    let err = backend.signup("taken@example.test", "pw").await.unwrap_err();
    assert!(matches!(err, BackendError::Rejected { status: 400, ref message } if message == "Email already registered"));

    let token = backend.login("a@example.test", "secret").await.unwrap();
    assert_eq!(token, "tok-123");
    let err = backend.login("a@example.test", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(), "Invalid credentials");

    let result = backend
        .generate(Some(&token), &Brief::new("AI tool", 3))
        .await
        .unwrap();
    assert_eq!(result.get("PRD").as_deref(), Some("PRD for AI tool"));
    assert_eq!(result.get("Landing Page").as_deref(), Some("depth 3"));
    assert_eq!(result.get("FAQ").as_deref(), Some("Bearer tok-123"));
    assert_eq!(result.len(), 4);

    let anonymous = backend.generate(None, &Brief::new("AI tool", 1)).await.unwrap();
    assert_eq!(anonymous.get("FAQ").as_deref(), Some("none"));

    let history = backend.history(Some(&token)).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].display_brief(), "Bearer tok-123");
    assert_eq!(history[1].display_brief(), "older");
}

#[tokio::test]
async fn unreachable_backend_is_offline() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&format!("http://{addr}"), BackendTimeouts::default()).unwrap();
    assert!(!backend.health().await);
    let err = backend.generate(None, &Brief::new("x", 2)).await.unwrap_err();
    assert!(err.is_unavailable());
}
