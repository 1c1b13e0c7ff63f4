use tracing::debug;

use crate::db::RecordStore;
use crate::error::{Result, RosterError};
use crate::models::StudentRecord;

/// Snapshot of the `students` table as of the last [`RosterView::refresh`].
/// Refreshing is caller-driven: every create, update, and delete is followed
/// by an explicit refresh.
#[derive(Debug, Default, Clone)]
pub struct RosterView {
    rows: Vec<StudentRecord>,
}

impl RosterView {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<StudentRecord>) -> Self {
        Self { rows }
    }

    /// Rebuild the snapshot from the store. On failure the previous rows stay
    /// in place.
    pub fn refresh(&mut self, store: &dyn RecordStore) -> Result<()> {
        let rows = store.list_all()?;
        debug!(rows = rows.len(), "roster refreshed");
        self.rows = rows;
        Ok(())
    }

    pub fn row_at(&self, index: usize) -> Result<&StudentRecord> {
        self.rows.get(index).ok_or(RosterError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    pub fn rows(&self) -> &[StudentRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the row holding `id`, if it is part of the snapshot.
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::models::StudentDraft;
    use crate::roster::testing::unavailable;

    /// Store whose contents can be swapped out and which can be told to fail.
    #[derive(Default)]
    struct ScriptedStore {
        rows: RefCell<Vec<StudentRecord>>,
        broken: Cell<bool>,
    }

    impl RecordStore for ScriptedStore {
        fn list_all(&self) -> Result<Vec<StudentRecord>> {
            if self.broken.get() {
                return Err(unavailable());
            }
            Ok(self.rows.borrow().clone())
        }

        fn create(&self, _draft: &StudentDraft) -> Result<i64> {
            unreachable!()
        }

        fn update(&self, _id: i64, _draft: &StudentDraft) -> Result<()> {
            unreachable!()
        }

        fn delete(&self, _id: i64) -> Result<()> {
            unreachable!()
        }
    }

    fn record(id: i64, name: &str) -> StudentRecord {
        StudentRecord {
            id,
            name: name.into(),
            course: "Math".into(),
            mobile: "555".into(),
        }
    }

    #[test]
    fn refresh_replaces_snapshot_in_store_order() {
        let store = ScriptedStore::default();
        *store.rows.borrow_mut() = vec![record(1, "Ann"), record(3, "Bo")];

        let mut view = RosterView::new();
        view.refresh(&store).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.row_at(1).unwrap().name, "Bo");
        assert_eq!(view.position_of(3), Some(1));

        *store.rows.borrow_mut() = vec![record(3, "Bo")];
        view.refresh(&store).unwrap();
        assert_eq!(view.rows(), &[record(3, "Bo")]);
        assert_eq!(view.position_of(1), None);
    }

    #[test]
    fn row_at_out_of_bounds_is_an_error() {
        let view = RosterView::new();
        assert!(matches!(
            view.row_at(0),
            Err(RosterError::RowOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn failed_refresh_keeps_previous_rows() {
        let store = ScriptedStore::default();
        *store.rows.borrow_mut() = vec![record(1, "Ann")];
        let mut view = RosterView::new();
        view.refresh(&store).unwrap();

        store.broken.set(true);
        assert!(matches!(
            view.refresh(&store),
            Err(RosterError::StorageUnavailable { .. })
        ));
        assert_eq!(view.rows(), &[record(1, "Ann")]);
    }
}
