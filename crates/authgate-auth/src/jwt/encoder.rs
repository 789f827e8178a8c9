//! Signed token creation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use authgate_core::config::AuthConfig;
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::types::SessionId;

use super::claims::SessionClaims;

/// One issued token together with the session it names.
#[derive(Debug, Clone)]
pub struct TokenDetails {
    /// Compact JWS string handed to the client.
    pub token: String,
    /// Session key embedded in the `uuid` claim.
    pub session_id: SessionId,
    /// Expiry, identical to the `exp` claim (second precision).
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh tokens issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: TokenDetails,
    /// Long-lived refresh token.
    pub refresh: TokenDetails,
}

/// Creates HS256-signed tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Build from the configured signing secret.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Mint a fresh session id and sign a token expiring at `expires_at`.
    pub fn issue(&self, expires_at: DateTime<Utc>) -> Result<TokenDetails, AppError> {
        let claims = SessionClaims {
            uuid: SessionId::generate(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to sign token", e))?;

        let expires_at = claims
            .expires_at()
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

        Ok(TokenDetails {
            token,
            session_id: claims.uuid,
            expires_at,
        })
    }
}
