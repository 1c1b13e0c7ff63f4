//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. They stay light-weight data holders so the other layers can focus on
//! presentation and persistence.

use std::fmt;
use std::str::FromStr;

use crate::error::RosterError;

/// A single row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    /// Primary key assigned by SQLite. Edit and delete flows hand it back to
    /// the store, so it travels with the row even though the table only
    /// displays it.
    pub id: i64,
    /// Display name. Not unique: two students may share it, which is why
    /// search returns a set of rows.
    pub name: String,
    /// Stored verbatim. Writes always go through [`Course`], but rows created
    /// by other tools may hold anything.
    pub course: String,
    /// Contact number kept as free text; no format is enforced.
    pub mobile: String,
}

/// Courses offered by the school. The order here is the order the editor
/// cycles through, and the first entry is the default for new students.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Course {
    Biology,
    Math,
    Astronomy,
    Physics,
}

impl Course {
    pub const ALL: [Course; 4] = [
        Course::Biology,
        Course::Math,
        Course::Astronomy,
        Course::Physics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Course::Biology => "Biology",
            Course::Math => "Math",
            Course::Astronomy => "Astronomy",
            Course::Physics => "Physics",
        }
    }

    /// Next course in the closed list, wrapping around.
    pub fn next(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous course in the closed list, wrapping around.
    pub fn previous(self) -> Self {
        let idx = self.position();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|course| *course == self)
            .unwrap_or(0)
    }
}

impl Default for Course {
    fn default() -> Self {
        Course::ALL[0]
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = RosterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.as_str() == value)
            .ok_or_else(|| RosterError::Validation(format!("Unknown course \"{value}\".")))
    }
}

/// Validated field values ready to be written to the store. The fields are
/// private so [`StudentDraft::new`] is the only way to build one: every draft
/// the store receives is already trimmed and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    name: String,
    course: Course,
    mobile: String,
}

impl StudentDraft {
    /// Trim the text fields and reject blanks with a message naming the first
    /// missing field.
    pub fn new(name: &str, course: Course, mobile: &str) -> Result<Self, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::Validation("Name is required.".into()));
        }
        let mobile = mobile.trim();
        if mobile.is_empty() {
            return Err(RosterError::Validation("Mobile is required.".into()));
        }
        Ok(Self {
            name: name.to_string(),
            course,
            mobile: mobile.to_string(),
        })
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
}
