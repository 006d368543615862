//! Error types for the board engine.

use thiserror::Error;

use crate::models::TaskId;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors returned by [`BoardStore`](crate::board::BoardStore) operations.
///
/// Every error is raised before any mutation, so a failed call leaves the
/// board exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A required task field was empty or unparseable
    #[error("missing or invalid {field}")]
    Validation { field: &'static str },

    /// No column with this key
    #[error("column not found: {key}")]
    ColumnNotFound { key: String },

    /// The task is not in the column the caller claimed it was in
    #[error("task {task_id} not found in column {column}")]
    TaskNotFound { task_id: TaskId, column: String },

    /// A board failed its structural checks
    #[error("invalid board: {reason}")]
    InvalidBoard { reason: String },
}

impl BoardError {
    pub(crate) fn column_not_found(key: impl Into<String>) -> Self {
        Self::ColumnNotFound { key: key.into() }
    }

    pub(crate) fn invalid_board(reason: impl Into<String>) -> Self {
        Self::InvalidBoard {
            reason: reason.into(),
        }
    }

    /// True for unknown columns and for tasks missing from their claimed column.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ColumnNotFound { .. } | Self::TaskNotFound { .. })
    }
}
