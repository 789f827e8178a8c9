//! Session lifecycle manager: register, login, logout and refresh flows.
//!
//! A session is one token-store entry keyed by the `uuid` claim of one
//! issued token. Every flow that hands out tokens stores both entries of the
//! pair before returning; rotation deletes and reissues, never updates.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tracing::{info, warn};

use authgate_core::config::AuthConfig;
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_core::traits::TokenStore;
use authgate_core::types::{SessionId, UserId};
use authgate_database::UserDirectory;
use authgate_database::directory::normalize_email;
use authgate_entity::user::NewUser;

use crate::jwt::{JwtDecoder, JwtEncoder, SessionClaims, TokenDetails, TokenPair};
use crate::password::PasswordHasher;

/// Directory error kinds passed through to callers unchanged.
const DIRECTORY_KINDS: &[ErrorKind] = &[
    ErrorKind::NotFound,
    ErrorKind::Conflict,
    ErrorKind::BadRequest,
];

/// Orchestrates the user directory, token issuer and token store.
#[derive(Clone)]
pub struct SessionManager {
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn TokenStore>,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a session manager over its collaborators.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn TokenStore>,
        hasher: PasswordHasher,
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        config: &AuthConfig,
    ) -> AppResult<Self> {
        let access_ttl = TimeDelta::from_std(config.access_ttl())
            .map_err(|e| AppError::configuration(format!("Access TTL out of range: {e}")))?;
        let refresh_ttl = TimeDelta::from_std(config.refresh_ttl())
            .map_err(|e| AppError::configuration(format!("Refresh TTL out of range: {e}")))?;

        Ok(Self {
            users,
            store,
            hasher,
            encoder,
            decoder,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Builds the issuer and hasher from `config`.
    pub fn from_config(
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn TokenStore>,
        config: &AuthConfig,
    ) -> AppResult<Self> {
        Self::new(
            users,
            store,
            PasswordHasher::new(&config.argon2)?,
            JwtEncoder::new(config),
            JwtDecoder::new(config),
            config,
        )
    }

    /// Create a user and log them in.
    ///
    /// A duplicate email fails with `Conflict` before any session is stored.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<TokenPair> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::bad_request("Email and password are required"));
        }

        let password_hash = self.hasher.hash_password(password.to_owned()).await?;

        let user = self
            .users
            .create(NewUser {
                name: name.trim().to_string(),
                email: normalize_email(email),
                password_hash,
            })
            .await
            .map_err(|e| e.into_internal_unless(DIRECTORY_KINDS))?;

        let pair = self.issue_pair(user.id).await?;

        info!(user_id = %user.id, "User registered");
        Ok(pair)
    }

    /// Verify credentials and issue a fresh token pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| e.into_internal_unless(DIRECTORY_KINDS))?;

        let valid = self
            .hasher
            .verify_password(password.to_owned(), user.password_hash.clone())
            .await?;

        if !valid {
            warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let pair = self.issue_pair(user.id).await?;

        info!(
            user_id = %user.id,
            access_session = %pair.access.session_id,
            "Login successful"
        );
        Ok(pair)
    }

    /// Revoke one session. The paired session of the same login is untouched.
    pub async fn logout(&self, session_id: &SessionId) -> AppResult<()> {
        self.store
            .delete(session_id)
            .await
            .map_err(|e| e.into_internal_unless(&[]))?;

        info!(session_id = %session_id, "Session revoked");
        Ok(())
    }

    /// Rotate: revoke the presented session, then issue a new pair.
    ///
    /// Only the caller whose removal actually claimed the session gets a pair;
    /// a concurrent or repeated refresh of the same session is `Unauthorized`.
    /// If issuance fails after the removal the caller holds no usable refresh
    /// session and must log in again.
    pub async fn refresh(&self, session_id: &SessionId, user_id: UserId) -> AppResult<TokenPair> {
        let claimed = self
            .store
            .take(session_id)
            .await
            .map_err(|e| e.into_internal_unless(&[]))?;

        if !claimed {
            warn!(session_id = %session_id, "Refresh of an already revoked session");
            return Err(AppError::unauthorized("Session is invalid or expired"));
        }

        let pair = self.issue_pair(user_id).await?;

        info!(
            user_id = %user_id,
            revoked_session = %session_id,
            refresh_session = %pair.refresh.session_id,
            "Session rotated"
        );
        Ok(pair)
    }

    /// Resolve a session to its user. `Unauthorized` if revoked or expired.
    pub async fn resolve_user(&self, session_id: &SessionId) -> AppResult<UserId> {
        self.store
            .get(session_id)
            .await
            .map_err(|e| e.into_internal_unless(&[ErrorKind::Unauthorized]))
    }

    /// Verify a presented token's signature, algorithm and expiry.
    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        self.decoder.verify(token)
    }

    /// Shared handle to the user directory.
    pub fn users(&self) -> Arc<dyn UserDirectory> {
        Arc::clone(&self.users)
    }

    async fn issue_pair(&self, user_id: UserId) -> AppResult<TokenPair> {
        let now = Utc::now();
        let access = self.encoder.issue(now + self.access_ttl)?;
        let refresh = self.encoder.issue(now + self.refresh_ttl)?;

        self.store_session(&access, user_id).await?;

        if let Err(e) = self.store_session(&refresh, user_id).await {
            if let Err(cleanup) = self.store.delete(&access.session_id).await {
                warn!(
                    session_id = %access.session_id,
                    error = %cleanup,
                    "Failed to remove access session after refresh store failure"
                );
            }
            return Err(e);
        }

        Ok(TokenPair { access, refresh })
    }

    async fn store_session(&self, details: &TokenDetails, user_id: UserId) -> AppResult<()> {
        let remaining = details.expires_at - Utc::now();
        if remaining <= TimeDelta::zero() {
            return Err(AppError::internal("Token expired before it could be stored"));
        }
        let ttl = remaining
            .to_std()
            .map_err(|e| AppError::internal(format!("Session TTL out of range: {e}")))?;

        self.store
            .set(&details.session_id, user_id, ttl)
            .await
            .map_err(|e| e.into_internal_unless(&[]))
    }
}
