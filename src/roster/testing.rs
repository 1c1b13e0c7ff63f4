//! Store doubles shared by the controller and shell tests.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use rusqlite::ffi;

use crate::db::{ensure_schema, RecordStore, SqliteStore};
use crate::error::{Result, RosterError};
use crate::models::{StudentDraft, StudentRecord};

/// The error a refresh sees when the database file cannot be opened.
pub(crate) fn unavailable() -> RosterError {
    RosterError::StorageUnavailable {
        path: PathBuf::from("students.sqlite"),
        source: rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_CANTOPEN), None),
    }
}

/// Real SQLite store whose next `list_all` can be made to fail. Clones share
/// the switch, so a test can keep one handle while the app owns another.
#[derive(Clone)]
pub(crate) struct FlakyStore {
    inner: SqliteStore,
    fail_next_list: Rc<Cell<bool>>,
}

impl FlakyStore {
    pub(crate) fn new() -> (tempfile::TempDir, Self) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.sqlite");
        ensure_schema(&path).unwrap();
        let store = Self {
            inner: SqliteStore::new(path),
            fail_next_list: Rc::new(Cell::new(false)),
        };
        (dir, store)
    }

    pub(crate) fn fail_next_list(&self) {
        self.fail_next_list.set(true);
    }
}

impl RecordStore for FlakyStore {
    fn list_all(&self) -> Result<Vec<StudentRecord>> {
        if self.fail_next_list.replace(false) {
            return Err(unavailable());
        }
        self.inner.list_all()
    }

    fn create(&self, draft: &StudentDraft) -> Result<i64> {
        self.inner.create(draft)
    }

    fn update(&self, id: i64, draft: &StudentDraft) -> Result<()> {
        self.inner.update(id, draft)
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.inner.delete(id)
    }
}
