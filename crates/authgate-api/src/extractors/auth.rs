//! `AuthSession` extractor: the identity the claim gate attached to the request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use authgate_core::error::AppError;
use authgate_core::types::RequestContext;

/// Authenticated session available in protected handlers.
#[derive(Debug, Clone)]
pub struct AuthSession(pub RequestContext);

impl std::ops::Deref for AuthSession {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthSession)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}
