//! Route definitions for the AuthGate HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware::auth::claim_gate;
use crate::state::AppState;

/// Build the router with every route, threading `state` through.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

/// Routes open to anonymous callers.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health_check))
}

/// Routes behind the claim gate.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/user", get(handlers::user::current_user))
        .route_layer(axum_middleware::from_fn_with_state(state, claim_gate))
}
