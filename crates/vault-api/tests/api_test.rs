//! End-to-end API tests over in-memory stores.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use vault_api::{AppState, build_app, build_state};
use vault_core::config::AppConfig;
use vault_database::repositories::ShareRepository;
use vault_entity::share::CreateShare;

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let config = AppConfig::from_toml(
            r#"
            [database]
            provider = "memory"

            [storage]
            provider = "memory"

            [share]
            public_origin = "https://vault.test"
            purge_interval_minutes = 0
            "#,
        )
        .unwrap();
        let state = build_state(config).await.unwrap();
        Self {
            app: build_app(state.clone()),
            state,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>, HeaderMap) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec(), headers)
    }

    async fn json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body, _) = self.send(request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    async fn sign_up(&self, email: &str) -> String {
        let (status, body) = self
            .json(json_request(
                Method::POST,
                "/api/auth/sign-up",
                None,
                json!({
                    "email": email,
                    "password": "correct-horse",
                    "confirm_password": "correct-horse",
                    "full_name": "Test User"
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }

    async fn upload(&self, token: &str, name: &str, data: &'static [u8]) -> Value {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/files?name={name}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/pdf")
            .header("x-encryption-key", "secret")
            .body(Body::from(data))
            .unwrap();
        let (status, body) = self.json(request).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"].clone()
    }
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).header("x-encryption-key", "secret");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.json(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_auth_flow() {
    let app = TestApp::new().await;
    let token = app.sign_up("Alice@Example.com").await;

    let (status, body) = app.json(get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@example.com");

    let (status, body) = app
        .json(json_request(
            Method::PUT,
            "/api/auth/me",
            Some(&token),
            json!({ "full_name": "Alice A." }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "Alice A.");

    let (status, body) = app
        .json(json_request(
            Method::POST,
            "/api/auth/sign-in",
            None,
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NOT_AUTHENTICATED");

    let (status, _) = app
        .json(json_request(Method::POST, "/api/auth/sign-out", Some(&token), json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.json(get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_errors() {
    let app = TestApp::new().await;
    app.sign_up("bob@example.com").await;

    let (status, body) = app
        .json(json_request(
            Method::POST,
            "/api/auth/sign-up",
            None,
            json!({
                "email": "bob@example.com",
                "password": "correct-horse",
                "confirm_password": "correct-horse"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, _) = app
        .json(json_request(
            Method::POST,
            "/api/auth/sign-up",
            None,
            json!({
                "email": "carol@example.com",
                "password": "correct-horse",
                "confirm_password": "battery-staple"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = TestApp::new().await;
    let (status, body) = app.json(get("/api/files", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NOT_AUTHENTICATED");

    let (status, _) = app.json(get("/api/files", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_versions_and_download() {
    let app = TestApp::new().await;
    let token = app.sign_up("alice@example.com").await;

    let v1 = app.upload(&token, "report.pdf", b"first draft").await;
    assert_eq!(v1["version"], 1);
    assert!(v1["previous_version_id"].is_null());

    let v2 = app.upload(&token, "report.pdf", b"final").await;
    assert_eq!(v2["version"], 2);
    assert_eq!(v2["previous_version_id"], v1["id"]);

    let (status, body) = app.json(get("/api/files", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let files = body["data"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["id"], v2["id"]);
    assert_eq!(files[0]["versions"].as_array().unwrap().len(), 1);

    let v2_id = v2["id"].as_str().unwrap();
    let (status, data, headers) = app
        .send(get(&format!("/api/files/{v2_id}/download"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data, b"final");
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");

    let (_, body) = app
        .json(get(&format!("/api/files/{v2_id}/versions"), Some(&token)))
        .await;
    let version_id = body["data"][0]["id"].as_str().unwrap().to_string();
    let (status, data, headers) = app
        .send(get(
            &format!("/api/files/{v2_id}/versions/{version_id}/download"),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data, b"first draft");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"report_v1.pdf\""
    );
}

#[tokio::test]
async fn test_upload_requires_encryption_key() {
    let app = TestApp::new().await;
    let token = app.sign_up("alice@example.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/files?name=notes.txt")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("hello"))
        .unwrap();
    let (status, body) = app.json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_files_are_private_to_their_owner() {
    let app = TestApp::new().await;
    let alice = app.sign_up("alice@example.com").await;
    let bob = app.sign_up("bob@example.com").await;

    let file = app.upload(&alice, "secret.pdf", b"top secret").await;
    let id = file["id"].as_str().unwrap();

    let (status, _) = app.json(get(&format!("/api/files/{id}"), Some(&bob))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.json(delete(&format!("/api/files/{id}"), &bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.json(delete(&format!("/api/files/{id}"), &alice)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_share_lifecycle() {
    let app = TestApp::new().await;
    let token = app.sign_up("alice@example.com").await;
    let file = app.upload(&token, "report.pdf", b"shared content").await;
    let file_id = file["id"].as_str().unwrap();

    let (status, body) = app
        .json(json_request(
            Method::POST,
            &format!("/api/files/{file_id}/shares"),
            Some(&token),
            json!({ "recipient_email": "a@b.com", "expires_in_days": 7 }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let share_token = body["data"]["token"].as_str().unwrap().to_string();
    let share_id = body["data"]["share_id"].as_str().unwrap().to_string();
    assert_eq!(
        body["data"]["url"],
        format!("https://vault.test/shared/{share_token}")
    );

    let (status, body) = app.json(get(&format!("/shared/{share_token}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "report.pdf");
    assert_eq!(body["data"]["recipient_email"], "a@b.com");

    let (status, data, _) = app
        .send(get(&format!("/shared/{share_token}/download"), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data, b"shared content");

    let (status, body) = app
        .json(get(&format!("/api/files/{file_id}/shares"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .json(delete(&format!("/api/shares/{share_id}"), &token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.json(get(&format!("/shared/{share_token}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_share_validation() {
    let app = TestApp::new().await;
    let token = app.sign_up("alice@example.com").await;
    let file = app.upload(&token, "report.pdf", b"x").await;
    let file_id = file["id"].as_str().unwrap();

    let (status, _) = app
        .json(json_request(
            Method::POST,
            &format!("/api/files/{file_id}/shares"),
            Some(&token),
            json!({ "recipient_email": "not-an-email", "expires_in_days": 7 }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(json_request(
            Method::POST,
            &format!("/api/files/{file_id}/shares"),
            Some(&token),
            json!({ "recipient_email": "a@b.com", "expires_in_days": 0 }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_share_is_gone() {
    let app = TestApp::new().await;
    let token = app.sign_up("alice@example.com").await;
    let file = app.upload(&token, "report.pdf", b"x").await;

    let expires_at = Utc::now() - Duration::hours(1);
    app.state
        .repositories
        .shares
        .create(&CreateShare {
            file_id: file["id"].as_str().unwrap().parse().unwrap(),
            share_token: "expired-token".to_string(),
            recipient_email: Some("a@b.com".to_string()),
            expires_at,
        })
        .await
        .unwrap();

    let (status, body) = app.json(get("/shared/expired-token", None)).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], "SHARE_EXPIRED");

    let (status, _) = app.json(get("/shared/nonexistent-token", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
