//! Fail-open utilities for graceful degradation
//!
//! Persistence must never take the board down: a snapshot that cannot be
//! read or written degrades to defaults instead of crashing. Use these
//! helpers for that kind of infrastructure operation only.
//!
//! DO NOT use fail-open for:
//! - Board mutations (correctness)
//! - Explicit user commands like init or login (the caller wants the error)

use tracing::warn;

use crate::error::Result;

/// Execute an operation that should fail open.
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// # Usage
///
/// ```
/// use plank_storage::fail_open;
///
/// let loaded = fail_open("snapshot read", || {
///     Ok::<_, plank_storage::StorageError>(42)
/// });
/// assert_eq!(loaded, Some(42));
/// ```
pub fn fail_open<F, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}
