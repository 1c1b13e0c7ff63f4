//! Core library surface for the Student Roster TUI application.
//!
//! The roster controller (`roster`) and the store behind it (`db`) carry all
//! of the record-management logic; `ui` is a thin terminal shell over them,
//! so the binary and the integration tests share the same pieces.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod roster;
pub mod ui;

/// Persistence: schema setup, the store trait, and its SQLite implementation.
pub use db::{ensure_schema, RecordStore, SqliteStore};
/// Error type shared by every layer below the terminal shell.
pub use error::RosterError;
/// Row and draft types passed between the store and the controller.
pub use models::{Course, StudentDraft, StudentRecord};
/// Controller pieces: snapshot, selection, editor, and search.
pub use roster::{
    search, Committed, EditorField, EditorMode, PendingDelete, RecordEditor, RosterView,
    Selection, SelectionController,
};
/// Terminal shell entry points used by the binary.
pub use ui::{run_app, App};
