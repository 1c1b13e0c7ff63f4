use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

use crate::error::RosterError;

/// Create the database file and the `students` table if they are missing.
/// Runs once at startup; the per-operation connections opened later never
/// create files, so a database removed mid-session surfaces as unavailable
/// instead of silently starting over.
pub fn ensure_schema(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            course TEXT,
            mobile TEXT
        )",
        [],
    )
    .context("failed to create students table")?;

    Ok(())
}

/// Open a short-lived read-write connection for a single statement.
pub(crate) fn open(db_path: &Path) -> Result<Connection, RosterError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(db_path, flags).map_err(|source| {
        RosterError::StorageUnavailable {
            path: db_path.to_path_buf(),
            source,
        }
    })
}
