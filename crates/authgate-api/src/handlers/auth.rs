//! Auth handlers: register, login, logout, refresh.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use authgate_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{MessageResponse, TokenPairResponse};
use crate::extractors::{AuthSession, ValidatedJson};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenPairResponse>), AppError> {
    let pair = state
        .session_manager
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(pair.into())))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let pair = state
        .session_manager
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(pair.into()))
}

/// POST /auth/logout
///
/// Revokes only the session of the presented token.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<MessageResponse>, AppError> {
    state.session_manager.logout(&auth.session_id).await?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// POST /auth/refresh
///
/// Presented with the refresh token; returns a brand-new pair.
pub async fn refresh(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<TokenPairResponse>, AppError> {
    let pair = state
        .session_manager
        .refresh(&auth.session_id, auth.user_id)
        .await?;

    Ok(Json(pair.into()))
}
