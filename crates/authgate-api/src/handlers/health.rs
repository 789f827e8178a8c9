//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use authgate_core::traits::TokenStore;
use authgate_database::UserDirectory;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_up = match state.store.health_check().await {
        Ok(up) => up,
        Err(e) => {
            warn!(error = %e, "Token store health check failed");
            false
        }
    };
    let directory_up = match state.users.health_check().await {
        Ok(up) => up,
        Err(e) => {
            warn!(error = %e, "User directory health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if store_up && directory_up { "ok" } else { "degraded" }.to_string(),
        store: if store_up { "up" } else { "down" }.to_string(),
    })
}
