//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use authgate_api::{AppState, build_app};
use authgate_auth::SessionManager;
use authgate_core::config::{
    AppConfig, Argon2Config, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig, StoreConfig,
};
use authgate_database::memory::MemoryUserDirectory;
use authgate_store::memory::MemoryTokenStore;

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Token store behind the app, for direct inspection
    pub store: MemoryTokenStore,
    /// User directory behind the app
    pub users: MemoryUserDirectory,
}

impl TestApp {
    /// Create an app over fresh in-memory backends.
    pub fn new() -> Self {
        let config = test_config();
        let store = MemoryTokenStore::new();
        let users = MemoryUserDirectory::new();

        let session_manager = SessionManager::from_config(
            Arc::new(users.clone()),
            Arc::new(store.clone()),
            &config.auth,
        )
        .expect("Failed to build session manager");

        let state = AppState::new(
            config,
            session_manager,
            Arc::new(users.clone()),
            Arc::new(store.clone()),
        );

        Self {
            router: build_app(state),
            store,
            users,
        }
    }

    /// Register a user and return `(access_token, refresh_token)`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/auth/register",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        response.token_pair()
    }

    /// Log in and return `(access_token, refresh_token)`.
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/auth/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.token_pair()
    }

    /// Make a JSON request, optionally with a bearer token.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a prebuilt request.
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Configuration with a fixed secret and cheap Argon2 parameters.
pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 168,
            argon2: Argon2Config {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
        },
        store: StoreConfig::default(),
        database: DatabaseConfig::default(),
        logging: LoggingConfig::default(),
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// Extract `(access_token, refresh_token)`.
    pub fn token_pair(&self) -> (String, String) {
        let field = |name: &str| {
            self.body
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_else(|| panic!("No {name} in response: {:?}", self.body))
                .to_string()
        };
        (field("access_token"), field("refresh_token"))
    }
}
