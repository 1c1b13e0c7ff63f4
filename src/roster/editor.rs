use tracing::warn;

use super::{Committed, RosterView};
use crate::db::RecordStore;
use crate::error::Result;
use crate::models::{Course, StudentDraft, StudentRecord};

/// Whether submitting creates a new student or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Insert,
    Edit { id: i64 },
}

/// Fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorField {
    #[default]
    Name,
    Course,
    Mobile,
}

/// Modal input collector shared by the "Add Student" and "Edit Student"
/// dialogs. The course is a closed choice: it can only be cycled, never typed.
#[derive(Debug, Clone)]
pub struct RecordEditor {
    /// Decides whether submit creates or updates, and carries the original id
    /// in the latter case.
    mode: EditorMode,
    /// Raw name as typed; trimmed only when a draft is built.
    name: String,
    course: Course,
    /// Raw mobile number as typed.
    mobile: String,
    /// Field receiving keystrokes.
    active: EditorField,
    /// Message from the last failed submit, shown inside the dialog.
    error: Option<String>,
}

impl RecordEditor {
    /// Blank editor for a new student; the course starts on the first option.
    pub fn insert() -> Self {
        Self {
            mode: EditorMode::Insert,
            name: String::new(),
            course: Course::default(),
            mobile: String::new(),
            active: EditorField::Name,
            error: None,
        }
    }

    /// Editor pre-filled from an existing row.
    pub fn edit(record: &StudentRecord) -> Self {
        let course = record.course.parse().unwrap_or_else(|_| {
            warn!(
                id = record.id,
                course = %record.course,
                "stored course is not in the course list; defaulting"
            );
            Course::default()
        });

        Self {
            mode: EditorMode::Edit { id: record.id },
            name: record.name.clone(),
            course,
            mobile: record.mobile.clone(),
            active: EditorField::Name,
            error: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn course(&self) -> Course {
        self.course
    }

    pub fn mobile(&self) -> &str {
        &self.mobile
    }

    pub fn active(&self) -> EditorField {
        self.active
    }

    /// Message from the last failed submit, cleared by further input.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus(&mut self, field: EditorField) {
        self.active = field;
    }

    /// Move focus forward: Name → Course → Mobile → Name.
    pub fn toggle_field(&mut self) {
        self.active = match self.active {
            EditorField::Name => EditorField::Course,
            EditorField::Course => EditorField::Mobile,
            EditorField::Mobile => EditorField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.active = match self.active {
            EditorField::Name => EditorField::Mobile,
            EditorField::Course => EditorField::Name,
            EditorField::Mobile => EditorField::Course,
        };
    }

    /// Append a character to the focused text field. Returns `false` when the
    /// character was rejected (control characters, or the course field).
    pub fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let accepted = match self.active {
            EditorField::Name => {
                self.name.push(ch);
                true
            }
            EditorField::Mobile => {
                self.mobile.push(ch);
                true
            }
            EditorField::Course => false,
        };
        if accepted {
            self.error = None;
        }
        accepted
    }

    pub fn push_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.push_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        match self.active {
            EditorField::Name => {
                self.name.pop();
            }
            EditorField::Mobile => {
                self.mobile.pop();
            }
            EditorField::Course => {}
        }
    }

    pub fn next_course(&mut self) {
        self.course = self.course.next();
        self.error = None;
    }

    pub fn previous_course(&mut self) {
        self.course = self.course.previous();
        self.error = None;
    }

    pub fn set_course(&mut self, course: Course) {
        self.course = course;
    }

    /// Submit is only meaningful once both text fields hold something.
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty() && !self.mobile.trim().is_empty()
    }

    pub fn validate(&self) -> Result<StudentDraft> {
        StudentDraft::new(&self.name, self.course, &self.mobile)
    }

    /// Validate, write through `store`, and refresh `view`.
    ///
    /// `Err` means nothing was written: the message stays on the editor so the
    /// dialog can show it and stay open. Once the write succeeds the result is
    /// `Ok`, even if the refresh afterwards fails; that failure is handed back
    /// in [`Committed::refresh_error`] so the dialog can still close without
    /// inviting a second insert.
    pub fn submit(
        &mut self,
        store: &dyn RecordStore,
        view: &mut RosterView,
    ) -> Result<Committed> {
        let id = match self.write(store) {
            Ok(id) => id,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };
        self.error = None;

        let refresh_error = view.refresh(store).err();
        if let Some(err) = &refresh_error {
            warn!(id, error = %err, "student saved but roster refresh failed");
        }
        Ok(Committed { id, refresh_error })
    }

    fn write(&self, store: &dyn RecordStore) -> Result<i64> {
        let draft = self.validate()?;
        let id = match self.mode {
            EditorMode::Insert => store.create(&draft)?,
            EditorMode::Edit { id } => {
                store.update(id, &draft)?;
                id
            }
        };
        Ok(id)
    }

    /// Character count of a text field, used to place the cursor.
    pub fn value_len(&self, field: EditorField) -> usize {
        match field {
            EditorField::Name => self.name.chars().count(),
            EditorField::Course => self.course.as_str().chars().count(),
            EditorField::Mobile => self.mobile.chars().count(),
        }
    }
}
