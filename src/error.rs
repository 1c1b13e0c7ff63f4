//! Typed failures of the roster core. The TUI glue wraps these in
//! `anyhow::Error` when it needs context, but the controller surfaces the
//! variants directly so callers can react to each kind.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    /// The database file could not be opened.
    #[error("Student database at {} is unavailable.", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A statement failed after the connection was established.
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("{0}")]
    Validation(String),

    /// Update or delete touched zero rows.
    #[error("Student #{id} no longer exists.")]
    NotFound { id: i64 },

    /// Edit or delete requested without an active selection.
    #[error("{0}")]
    InvalidState(String),

    #[error("Row {index} is out of range ({len} rows).")]
    RowOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, RosterError>;
