//! Key layout for external stores.

use authgate_core::types::SessionId;

/// Namespace for session entries, placed after the configured prefix.
pub const SESSION_NAMESPACE: &str = "session:";

/// Key of a session entry, without the backend prefix.
pub fn session_key(session_id: &SessionId) -> String {
    format!("{SESSION_NAMESPACE}{session_id}")
}
