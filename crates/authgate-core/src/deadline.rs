//! Deadline enforcement for calls into external dependencies.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::result::AppResult;

/// Awaits `operation`, failing with `Internal` if it does not finish within `limit`.
///
/// `what` names the operation in logs and in the (server-side) error message.
pub async fn with_deadline<T, F>(limit: Duration, what: &str, operation: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation = what, timeout_ms = limit.as_millis() as u64, "Operation timed out");
            Err(AppError::internal(format!(
                "{what} timed out after {}ms",
                limit.as_millis()
            )))
        }
    }
}
