//! Integration tests for registration and login.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_returns_token_pair() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "secret1",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let (access, refresh) = response.token_pair();
    assert_ne!(access, refresh);
    assert_eq!(app.store.len(), 2);
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_register_validation() {
    let app = helpers::TestApp::new();

    let cases = [
        json!({ "name": "Ada", "email": "not-an-email", "password": "secret1" }),
        json!({ "name": "Ada", "email": "ada@example.com", "password": "12345" }),
        json!({ "name": "Augusta Ada King-Noel", "email": "ada@example.com", "password": "secret1" }),
        json!({ "name": "Ada", "password": "secret1" }),
    ];

    for body in cases {
        let response = app
            .request("POST", "/auth/register", Some(body.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(response.error_code(), Some("BAD_REQUEST"));
    }
    assert_eq!(app.store.len(), 0);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = helpers::TestApp::new();

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{\"email\": "))
        .unwrap();

    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = helpers::TestApp::new();
    app.register("Ada", "ada@example.com", "secret1").await;
    assert_eq!(app.store.len(), 2);

    let response = app
        .request(
            "POST",
            "/auth/register",
            Some(json!({
                "name": "Imposter",
                "email": "Ada@Example.com",
                "password": "secret2",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), Some("CONFLICT"));
    assert_eq!(app.store.len(), 2);
}

#[tokio::test]
async fn test_login_success() {
    let app = helpers::TestApp::new();
    app.register("Ada", "ada@example.com", "secret1").await;

    let (access, _) = app.login("ada@example.com", "secret1").await;

    let response = app.request("GET", "/user", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "ada@example.com");
    assert_eq!(response.body["name"], "Ada");
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = helpers::TestApp::new();
    app.register("Ada", "ada@example.com", "secret1").await;

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "secret1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "up");
}
