//! User directory contract.

use async_trait::async_trait;

use authgate_core::result::AppResult;
use authgate_core::types::UserId;
use authgate_entity::user::{NewUser, User};

/// Persistent store of registered users.
///
/// Emails are unique and compared case-insensitively.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a user. `Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Look up by email. `NotFound` if absent.
    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    /// Look up by id. `NotFound` if absent.
    async fn find_by_id(&self, id: UserId) -> AppResult<User>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Canonical form used for email comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
