//! Error types for the plank storage library.

use thiserror::Error;

/// Storage-level failures.
///
/// None of these escape to the board core: snapshot reads fail open to the
/// default board, and snapshot writes are logged and swallowed. They
/// surface only from explicit commands (init, login) where the caller
/// wants to know.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot violates board invariants: {0}")]
    Snapshot(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias using the plank storage error type.
pub type Result<T> = std::result::Result<T, StorageError>;
