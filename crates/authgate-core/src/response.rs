//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Message sent to clients in place of any internal error text.
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected error occurred";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&AppError> for ApiErrorResponse {
    fn from(err: &AppError) -> Self {
        let message = match err.kind {
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => err.message.clone(),
        };
        Self {
            error: err.kind.code().to_string(),
            message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::Internal {
            match &self.source {
                Some(source) => {
                    tracing::error!(error = %self.message, source = %source, "Internal server error")
                }
                None => tracing::error!(error = %self.message, "Internal server error"),
            }
        }

        let body = ApiErrorResponse::from(&self);
        (self.kind.status_code(), Json(body)).into_response()
    }
}
