//! Current-user handler.

use axum::Json;
use axum::extract::State;

use authgate_core::error::{AppError, ErrorKind};
use authgate_database::UserDirectory;

use crate::dto::response::UserResponse;
use crate::extractors::AuthSession;
use crate::state::AppState;

/// GET /user
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await
        .map_err(|e| e.into_internal_unless(&[ErrorKind::NotFound]))?;

    Ok(Json(user.into()))
}
