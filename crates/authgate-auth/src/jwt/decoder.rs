//! Token verification.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

use super::claims::SessionClaims;

/// Verifies HS256 tokens and extracts their claims.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Build from the configured signing secret.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature, algorithm and expiry, then return the claims.
    ///
    /// Every failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| {
                debug!(error = %e, "Token rejected");
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
                    JwtErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    JwtErrorKind::InvalidAlgorithm => {
                        AppError::unauthorized("Unexpected signing method")
                    }
                    _ => AppError::unauthorized("Invalid token"),
                }
            },
        )?;

        if data.claims.is_expired_at(Utc::now()) {
            return Err(AppError::unauthorized("Token has expired"));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use authgate_core::config::Argon2Config;
    use authgate_core::error::ErrorKind;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 168,
            argon2: Argon2Config::default(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let cfg = config("unit-test-secret");
        let encoder = JwtEncoder::new(&cfg);
        let decoder = JwtDecoder::new(&cfg);

        let details = encoder.issue(Utc::now() + Duration::minutes(15)).unwrap();
        let claims = decoder.verify(&details.token).unwrap();

        assert_eq!(claims.uuid, details.session_id);
        assert_eq!(claims.exp, details.expires_at.timestamp());
    }

    #[test]
    fn test_each_token_gets_fresh_session() {
        let encoder = JwtEncoder::new(&config("unit-test-secret"));
        let exp = Utc::now() + Duration::minutes(15);
        let a = encoder.issue(exp).unwrap();
        let b = encoder.issue(exp).unwrap();
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let cfg = config("unit-test-secret");
        let details = JwtEncoder::new(&cfg)
            .issue(Utc::now() + Duration::minutes(15))
            .unwrap();

        let mut bytes = details.token.into_bytes();
        let last = bytes.len() - 2;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let err = JwtDecoder::new(&cfg).verify(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let details = JwtEncoder::new(&config("secret-a"))
            .issue(Utc::now() + Duration::minutes(15))
            .unwrap();
        let err = JwtDecoder::new(&config("secret-b"))
            .verify(&details.token)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_expired_token_rejected() {
        let cfg = config("unit-test-secret");
        let details = JwtEncoder::new(&cfg)
            .issue(Utc::now() - Duration::seconds(1))
            .unwrap();
        let err = JwtDecoder::new(&cfg).verify(&details.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let cfg = config("unit-test-secret");
        let claims = SessionClaims {
            uuid: authgate_core::types::SessionId::generate(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = JwtDecoder::new(&cfg).verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_missing_claims_rejected() {
        #[derive(serde::Serialize)]
        struct NoSession {
            exp: i64,
        }
        let cfg = config("unit-test-secret");
        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSession {
                exp: (Utc::now() + Duration::minutes(5)).timestamp(),
            },
            &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = JwtDecoder::new(&cfg).verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_garbage_rejected() {
        let decoder = JwtDecoder::new(&config("unit-test-secret"));
        assert!(decoder.verify("not.a.jwt").is_err());
        assert!(decoder.verify("").is_err());
    }
}
