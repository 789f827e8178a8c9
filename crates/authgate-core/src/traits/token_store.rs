//! Token store trait for pluggable session backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{SessionId, UserId};

/// Key-value store mapping a session identifier to its owning user.
///
/// Implementations must be linearizable per key. A key that is absent and a
/// key whose TTL has elapsed are indistinguishable to callers: both fail
/// `get` with `Unauthorized`.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve a session. `Unauthorized` if absent or expired, `Internal` on
    /// backend failure.
    async fn get(&self, session_id: &SessionId) -> AppResult<UserId>;

    /// Store a session with a time-to-live. A zero TTL stores nothing.
    async fn set(&self, session_id: &SessionId, user_id: UserId, ttl: Duration) -> AppResult<()>;

    /// Remove a session. Removing an unknown key succeeds.
    async fn delete(&self, session_id: &SessionId) -> AppResult<()>;

    /// Remove a session and report whether a live entry was removed.
    ///
    /// Among concurrent callers presenting the same key, at most one
    /// observes `true`.
    async fn take(&self, session_id: &SessionId) -> AppResult<bool>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
