//! Claim validation gate for protected routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use authgate_auth::SessionManager;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::types::RequestContext;

use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Verifies the bearer token, resolves its session and attaches the
/// resulting [`RequestContext`] before calling the protected handler.
pub async fn claim_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let context = authenticate(request.headers(), &state.session_manager).await?;
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Run every gate check against `headers`.
pub async fn authenticate(
    headers: &HeaderMap,
    sessions: &SessionManager,
) -> AppResult<RequestContext> {
    let token = bearer_token(headers)?;

    let claims = sessions.verify_token(token)?;
    if claims.uuid.is_empty() {
        return Err(AppError::bad_request("Token carries no session"));
    }

    let user_id = sessions.resolve_user(&claims.uuid).await?;
    debug!(session_id = %claims.uuid, user_id = %user_id, "Session accepted");

    Ok(RequestContext::new(claims.uuid, user_id))
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// A missing header is `Unauthorized`; a present but malformed one is
/// `BadRequest`.
pub fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    let text = value
        .to_str()
        .map_err(|_| AppError::bad_request("Authorization header is not valid text"))?;

    let token = text
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AppError::bad_request("Authorization header must use the Bearer scheme"))?
        .trim();

    if token.is_empty() {
        return Err(AppError::bad_request("Bearer token is empty"));
    }
    Ok(token)
}
