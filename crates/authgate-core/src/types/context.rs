//! Identity attached to a request once the claim gate accepts it.

use super::id::{SessionId, UserId};

/// Verified identity of the caller.
///
/// Only constructed after the token signature, expiry, and session entry
/// have all been checked; there is no partially-populated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Session identifier taken from the token's `uuid` claim.
    pub session_id: SessionId,
    /// User the session resolved to in the token store.
    pub user_id: UserId,
}

impl RequestContext {
    /// Creates a context from a resolved session.
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        Self {
            session_id,
            user_id,
        }
    }
}
