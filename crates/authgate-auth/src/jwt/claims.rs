//! Claims carried by every issued token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use authgate_core::types::SessionId;

/// JWT payload: the session key and the expiry, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Token-store key of the session this token belongs to.
    pub uuid: SessionId,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl SessionClaims {
    /// Expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether `exp` is at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
