//! # authgate-api
//!
//! HTTP API layer for AuthGate built on Axum.
//!
//! Public routes register and log users in; protected routes sit behind the
//! claim gate, which verifies the bearer token and resolves its session
//! before the handler runs.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
