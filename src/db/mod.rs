//! Persistence layer. Callers only see the [`RecordStore`] trait, so the
//! SQLite details (and any future async boundary) stay behind it.

mod connection;
mod students;

pub use connection::ensure_schema;
pub use students::SqliteStore;

use crate::error::Result;
use crate::models::{StudentDraft, StudentRecord};

/// The four statements the roster needs from its backing table.
pub trait RecordStore {
    /// Every student, ordered by id.
    fn list_all(&self) -> Result<Vec<StudentRecord>>;

    /// Insert a student and return the id the store assigned.
    fn create(&self, draft: &StudentDraft) -> Result<i64>;

    /// Replace all editable fields. `NotFound` when no row has `id`.
    fn update(&self, id: i64, draft: &StudentDraft) -> Result<()>;

    /// `NotFound` when no row has `id`.
    fn delete(&self, id: i64) -> Result<()>;
}
