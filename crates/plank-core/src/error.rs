//! Error types for the plank core library.

use thiserror::Error;

/// Invariant violations reported by [`Board::validate`](crate::Board::validate).
///
/// Store mutations never raise these: unknown references degrade to silent
/// no-ops at the store boundary. Validation exists for snapshots coming in
/// from outside (persistence) and for tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("column {column_id} references unknown task {task_id}")]
    DanglingTaskRef { column_id: String, task_id: String },

    #[error("task {task_id} is placed in more than one column")]
    DuplicatePlacement { task_id: String },

    #[error("task {task_id} is not placed in any column")]
    OrphanTask { task_id: String },

    #[error("duplicate column id: {column_id}")]
    DuplicateColumnId { column_id: String },

    #[error("task stored under key {key} carries id {task_id}")]
    TaskKeyMismatch { key: String, task_id: String },
}

/// Result type alias using the plank core error type.
pub type Result<T> = std::result::Result<T, BoardError>;
