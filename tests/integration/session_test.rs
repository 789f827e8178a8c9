//! Integration tests for the claim gate, logout and refresh rotation.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};

use authgate_database::UserDirectory;

#[tokio::test]
async fn test_protected_route_round_trip() {
    let app = helpers::TestApp::new();
    let (access, _) = app.register("Ada", "ada@example.com", "secret1").await;

    let response = app.request("GET", "/user", None, Some(&access)).await;

    assert_eq!(response.status, StatusCode::OK);
    let id = response.body["id"].as_str().unwrap();
    let registered = app.users.find_by_email("ada@example.com").await.unwrap();
    assert_eq!(uuid::Uuid::parse_str(id).unwrap(), registered.id.0);
    assert_eq!(response.body["email"], "ada@example.com");
}

#[tokio::test]
async fn test_missing_authorization_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/user", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_malformed_authorization_is_bad_request() {
    let app = helpers::TestApp::new();

    for header in ["Token abc", "Bearer ", "Basic dXNlcjpwYXNz"] {
        let req = Request::builder()
            .method("GET")
            .uri("/user")
            .header("Authorization", header)
            .body(Body::empty())
            .unwrap();

        let response = app.send(req).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "header {header:?}");
    }
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let app = helpers::TestApp::new();
    let (access, _) = app.register("Ada", "ada@example.com", "secret1").await;

    let mut bytes = access.into_bytes();
    let idx = bytes.len() - 2;
    bytes[idx] = if bytes[idx] == b'x' { b'y' } else { b'x' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = app.request("GET", "/user", None, Some(&tampered)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/user", None, Some("not-a-jwt")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_presented_session_only() {
    let app = helpers::TestApp::new();
    let (access, refresh) = app.register("Ada", "ada@example.com", "secret1").await;

    let response = app.request("POST", "/auth/logout", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());

    let response = app.request("POST", "/auth/refresh", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/user", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_twice_is_unauthorized() {
    let app = helpers::TestApp::new();
    let (access, _) = app.register("Ada", "ada@example.com", "secret1").await;

    let first = app.request("POST", "/auth/logout", None, Some(&access)).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.request("POST", "/auth/logout", None, Some(&access)).await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/user", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let app = helpers::TestApp::new();
    let (access, refresh) = app.register("Ada", "ada@example.com", "secret1").await;

    let response = app.request("POST", "/auth/refresh", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::OK);
    let (new_access, new_refresh) = response.token_pair();
    assert_ne!(new_access, access);
    assert_ne!(new_refresh, refresh);

    let replay = app.request("POST", "/auth/refresh", None, Some(&refresh)).await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);

    let response = app.request("GET", "/user", None, Some(&new_access)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("POST", "/auth/refresh", None, Some(&new_refresh))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_refresh_with_same_token() {
    let app = helpers::TestApp::new();
    let (_, refresh) = app.register("Ada", "ada@example.com", "secret1").await;

    let (first, second) = tokio::join!(
        app.request("POST", "/auth/refresh", None, Some(&refresh)),
        app.request("POST", "/auth/refresh", None, Some(&refresh)),
    );

    let mut statuses = [first.status, second.status];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::UNAUTHORIZED]);
    assert_eq!(app.store.len(), 3);
}

#[tokio::test]
async fn test_concurrent_logins_are_independent() {
    let app = helpers::TestApp::new();
    app.register("Ada", "ada@example.com", "secret1").await;
    app.register("Bob", "bob@example.com", "secret2").await;

    let (ada, bob) = tokio::join!(
        app.login("ada@example.com", "secret1"),
        app.login("bob@example.com", "secret2"),
    );

    let (ada_user, bob_user) = tokio::join!(
        app.request("GET", "/user", None, Some(&ada.0)),
        app.request("GET", "/user", None, Some(&bob.0)),
    );

    assert_eq!(ada_user.body["email"], "ada@example.com");
    assert_eq!(bob_user.body["email"], "bob@example.com");
    assert_ne!(ada_user.body["id"], bob_user.body["id"]);
}
