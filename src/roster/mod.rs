//! Record-management controller: the in-memory roster snapshot plus the
//! selection, editing, and search logic layered on top of it. Nothing in here
//! touches the terminal; the UI shell drives these types and renders them.

mod editor;
mod search;
mod selection;
#[cfg(test)]
pub(crate) mod testing;
mod view;

pub use editor::{EditorField, EditorMode, RecordEditor};
pub use search::search;
pub use selection::{PendingDelete, Selection, SelectionController};
pub use view::RosterView;

use crate::error::RosterError;

/// A write that reached the store. The change is durable even when
/// `refresh_error` is set; in that case only the snapshot is behind, and the
/// caller must not retry the write.
#[derive(Debug)]
pub struct Committed {
    /// Student that was created, updated, or deleted.
    pub id: i64,
    /// Failure of the refresh that followed the write, if it failed.
    pub refresh_error: Option<RosterError>,
}
