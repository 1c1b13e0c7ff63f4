use std::path::{Path, PathBuf};

use rusqlite::params;
use tracing::{debug, info};

use super::connection::open;
use super::RecordStore;
use crate::error::{Result, RosterError};
use crate::models::{StudentDraft, StudentRecord};

/// [`RecordStore`] backed by a single SQLite file. Only the path is kept
/// around; every call opens its own connection, runs one statement, and drops
/// the connection before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<StudentRecord>> {
        let conn = open(&self.path)?;
        let mut stmt = conn.prepare("SELECT id, name, course, mobile FROM students ORDER BY id")?;

        // Columns are nullable in the schema; rows written elsewhere may hold
        // NULLs, which display as blanks.
        let students = stmt
            .query_map([], |row| {
                Ok(StudentRecord {
                    id: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    course: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    mobile: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    /// Blank fields cannot reach this point: a [`StudentDraft`] only exists
    /// once its fields have been trimmed and checked.
    fn create(&self, draft: &StudentDraft) -> Result<i64> {
        let conn = open(&self.path)?;
        conn.execute(
            "INSERT INTO students (name, course, mobile) VALUES (?1, ?2, ?3)",
            params![draft.name(), draft.course().as_str(), draft.mobile()],
        )?;

        let id = conn.last_insert_rowid();
        info!(id, name = %draft.name(), course = %draft.course(), "created student");
        Ok(id)
    }

    fn update(&self, id: i64, draft: &StudentDraft) -> Result<()> {
        let conn = open(&self.path)?;
        let updated = conn.execute(
            "UPDATE students SET name = ?1, course = ?2, mobile = ?3 WHERE id = ?4",
            params![draft.name(), draft.course().as_str(), draft.mobile(), id],
        )?;

        if updated == 0 {
            Err(RosterError::NotFound { id })
        } else {
            info!(id, name = %draft.name(), course = %draft.course(), "updated student");
            Ok(())
        }
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = open(&self.path)?;
        let deleted = conn.execute("DELETE FROM students WHERE id = ?1", params![id])?;

        if deleted == 0 {
            Err(RosterError::NotFound { id })
        } else {
            info!(id, "deleted student");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use crate::models::Course;

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.sqlite");
        ensure_schema(&path).unwrap();
        (dir, SqliteStore::new(path))
    }

    fn draft(name: &str, course: Course, mobile: &str) -> StudentDraft {
        StudentDraft::new(name, course, mobile).unwrap()
    }

    #[test]
    fn create_assigns_fresh_ids_in_list_order() {
        let (_dir, store) = store();
        let first = store.create(&draft("Ann", Course::Math, "555-1")).unwrap();
        let second = store.create(&draft("Bo", Course::Biology, "555-2")).unwrap();
        assert_ne!(first, second);

        let students = store.list_all().unwrap();
        assert_eq!(
            students,
            vec![
                StudentRecord {
                    id: first,
                    name: "Ann".into(),
                    course: "Math".into(),
                    mobile: "555-1".into(),
                },
                StudentRecord {
                    id: second,
                    name: "Bo".into(),
                    course: "Biology".into(),
                    mobile: "555-2".into(),
                },
            ]
        );
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, store) = store();
        let first = store.create(&draft("Ann", Course::Math, "1")).unwrap();
        store.delete(first).unwrap();
        let second = store.create(&draft("Ann", Course::Math, "1")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn repeated_update_leaves_same_state() {
        let (_dir, store) = store();
        let id = store.create(&draft("Ann", Course::Math, "555-1")).unwrap();
        let change = draft("Ann", Course::Physics, "555-1");

        store.update(id, &change).unwrap();
        let once = store.list_all().unwrap();
        store.update(id, &change).unwrap();
        assert_eq!(store.list_all().unwrap(), once);
        assert_eq!(once[0].course, "Physics");
    }

    #[test]
    fn update_and_delete_of_missing_id_report_not_found() {
        let (_dir, store) = store();
        let change = draft("Ann", Course::Math, "555-1");
        assert!(matches!(
            store.update(42, &change),
            Err(RosterError::NotFound { id: 42 })
        ));
        assert!(matches!(
            store.delete(42),
            Err(RosterError::NotFound { id: 42 })
        ));
    }

    #[test]
    fn padded_input_is_stored_trimmed() {
        let (_dir, store) = store();
        let id = store
            .create(&draft("  Ann ", Course::Math, " 555-1  "))
            .unwrap();
        store
            .update(id, &draft(" Ann B ", Course::Physics, "555-9 "))
            .unwrap();

        let students = store.list_all().unwrap();
        assert_eq!(students[0].name, "Ann B");
        assert_eq!(students[0].mobile, "555-9");
    }

    #[test]
    fn missing_database_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("absent.sqlite"));
        assert!(matches!(
            store.list_all(),
            Err(RosterError::StorageUnavailable { .. })
        ));
        assert!(!dir.path().join("absent.sqlite").exists());
    }
}
