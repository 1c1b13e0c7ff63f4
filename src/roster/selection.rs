use tracing::{debug, info, warn};

use super::{Committed, RecordEditor, RosterView};
use crate::db::RecordStore;
use crate::error::{Result, RosterError};

/// Which row, if any, the contextual actions apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Row(usize),
}

/// Confirmation token returned by [`SelectionController::delete`]. Nothing is
/// removed until it is handed back to
/// [`SelectionController::confirm_delete`]; dropping it cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    /// Row to remove.
    pub id: i64,
    /// Name shown in the confirmation prompt and the status line.
    pub name: String,
}

/// Single-row selection over a [`RosterView`]. The selected record id is kept
/// alongside the index so a refresh can tell whether the row still exists.
#[derive(Debug, Default, Clone)]
pub struct SelectionController {
    selection: Selection,
    /// Id of the record at `selection`, kept in step with it.
    selected_id: Option<i64>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Edit and delete are only offered while this is true.
    pub fn has_selection(&self) -> bool {
        matches!(self.selection, Selection::Row(_))
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_id
    }

    /// Record that row `index` was activated. Out-of-range indices leave the
    /// current selection untouched.
    pub fn activate(&mut self, view: &RosterView, index: usize) -> Result<()> {
        let record = view.row_at(index)?;
        self.selection = Selection::Row(index);
        self.selected_id = Some(record.id);
        debug!(index, id = record.id, "row selected");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
        self.selected_id = None;
    }

    /// Re-anchor the selection after `view` was refreshed. A selected row that
    /// disappeared drops the selection; one that moved keeps it at its new
    /// index.
    pub fn reconcile(&mut self, view: &RosterView) {
        let Some(id) = self.selected_id else {
            self.selection = Selection::None;
            return;
        };

        match view.position_of(id) {
            Some(index) => self.selection = Selection::Row(index),
            None => {
                debug!(id, "selected row no longer present");
                self.clear();
            }
        }
    }

    /// Open an editor pre-filled from the selected row.
    pub fn edit(&self, view: &RosterView) -> Result<RecordEditor> {
        let index = self.require_selection("edit")?;
        Ok(RecordEditor::edit(view.row_at(index)?))
    }

    /// First half of a delete: describe what would be removed so the caller
    /// can ask for confirmation.
    pub fn delete(&self, view: &RosterView) -> Result<PendingDelete> {
        let index = self.require_selection("delete")?;
        let record = view.row_at(index)?;
        Ok(PendingDelete {
            id: record.id,
            name: record.name.clone(),
        })
    }

    /// Second half of a delete, run once the user said yes.
    ///
    /// `Err` means the row was not deleted. After a successful delete the
    /// result is `Ok` and the selection on that row is gone, even if the
    /// refresh that follows fails; the refresh failure travels in
    /// [`Committed::refresh_error`].
    pub fn confirm_delete(
        &mut self,
        pending: PendingDelete,
        store: &dyn RecordStore,
        view: &mut RosterView,
    ) -> Result<Committed> {
        store.delete(pending.id)?;
        info!(id = pending.id, name = %pending.name, "student removed from roster");
        if self.selected_id == Some(pending.id) {
            self.clear();
        }

        let refresh_error = match view.refresh(store) {
            Ok(()) => {
                self.reconcile(view);
                None
            }
            Err(err) => {
                warn!(id = pending.id, error = %err, "student deleted but roster refresh failed");
                Some(err)
            }
        };
        Ok(Committed {
            id: pending.id,
            refresh_error,
        })
    }

    fn require_selection(&self, action: &str) -> Result<usize> {
        match self.selection {
            Selection::Row(index) => Ok(index),
            Selection::None => Err(RosterError::InvalidState(format!(
                "Select a student before choosing {action}."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ensure_schema, SqliteStore};
    use crate::models::{Course, StudentDraft};
    use crate::roster::testing::FlakyStore;

    fn seeded(names: &[&str]) -> (tempfile::TempDir, SqliteStore, RosterView) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.sqlite");
        ensure_schema(&path).unwrap();
        let store = SqliteStore::new(path);
        for name in names {
            store
                .create(&StudentDraft::new(name, Course::Math, "555").unwrap())
                .unwrap();
        }
        let mut view = RosterView::new();
        view.refresh(&store).unwrap();
        (dir, store, view)
    }

    #[test]
    fn edit_and_delete_require_selection() {
        let (_dir, _store, view) = seeded(&["Ann"]);
        let selection = SelectionController::new();
        assert!(!selection.has_selection());
        assert!(matches!(
            selection.edit(&view),
            Err(RosterError::InvalidState(_))
        ));
        assert!(matches!(
            selection.delete(&view),
            Err(RosterError::InvalidState(_))
        ));
    }

    #[test]
    fn activation_moves_between_rows_directly() {
        let (_dir, _store, view) = seeded(&["Ann", "Bo"]);
        let mut selection = SelectionController::new();
        selection.activate(&view, 0).unwrap();
        assert_eq!(selection.selection(), Selection::Row(0));
        selection.activate(&view, 1).unwrap();
        assert_eq!(selection.selection(), Selection::Row(1));
        assert_eq!(selection.edit(&view).unwrap().name(), "Bo");
    }

    #[test]
    fn activating_missing_row_keeps_state() {
        let (_dir, _store, view) = seeded(&["Ann"]);
        let mut selection = SelectionController::new();
        selection.activate(&view, 0).unwrap();
        assert!(matches!(
            selection.activate(&view, 5),
            Err(RosterError::RowOutOfRange { index: 5, len: 1 })
        ));
        assert_eq!(selection.selection(), Selection::Row(0));
    }

    #[test]
    fn declined_delete_changes_nothing() {
        let (_dir, store, view) = seeded(&["Ann"]);
        let mut selection = SelectionController::new();
        selection.activate(&view, 0).unwrap();
        let pending = selection.delete(&view).unwrap();
        assert_eq!(pending.name, "Ann");

        assert_eq!(store.list_all().unwrap().len(), 1);
        assert_eq!(selection.selection(), Selection::Row(0));
    }

    #[test]
    fn confirmed_delete_clears_selection() {
        let (_dir, store, mut view) = seeded(&["Ann", "Bo"]);
        let mut selection = SelectionController::new();
        selection.activate(&view, 0).unwrap();
        let pending = selection.delete(&view).unwrap();

        selection.confirm_delete(pending, &store, &mut view).unwrap();
        assert_eq!(selection.selection(), Selection::None);
        assert_eq!(view.len(), 1);
        assert_eq!(view.row_at(0).unwrap().name, "Bo");
    }

    #[test]
    fn reconcile_follows_selected_id() {
        let (_dir, store, mut view) = seeded(&["Ann", "Bo"]);
        let mut selection = SelectionController::new();
        selection.activate(&view, 1).unwrap();

        let ann = view.row_at(0).unwrap().id;
        store.delete(ann).unwrap();
        view.refresh(&store).unwrap();
        selection.reconcile(&view);
        assert_eq!(selection.selection(), Selection::Row(0));

        let bo = view.row_at(0).unwrap().id;
        store.delete(bo).unwrap();
        view.refresh(&store).unwrap();
        selection.reconcile(&view);
        assert_eq!(selection.selection(), Selection::None);
    }

    #[test]
    fn stale_delete_reports_not_found() {
        let (_dir, store, mut view) = seeded(&["Ann"]);
        let mut selection = SelectionController::new();
        selection.activate(&view, 0).unwrap();
        let pending = selection.delete(&view).unwrap();
        store.delete(pending.id).unwrap();

        assert!(matches!(
            selection.confirm_delete(pending, &store, &mut view),
            Err(RosterError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_that_outlives_failed_refresh_still_succeeds() {
        let (_dir, store) = FlakyStore::new();
        store
            .create(&StudentDraft::new("Ann", Course::Math, "555").unwrap())
            .unwrap();
        let mut view = RosterView::new();
        view.refresh(&store).unwrap();
        let mut selection = SelectionController::new();
        selection.activate(&view, 0).unwrap();
        let pending = selection.delete(&view).unwrap();

        store.fail_next_list();
        let committed = selection.confirm_delete(pending, &store, &mut view).unwrap();
        assert!(committed.refresh_error.is_some());
        assert_eq!(selection.selection(), Selection::None);
        assert!(store.list_all().unwrap().is_empty());
    }
}
