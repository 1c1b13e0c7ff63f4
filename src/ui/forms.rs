use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::roster::{EditorField, EditorMode, PendingDelete, RecordEditor};

/// Labels in display order. The prefix widths double as cursor offsets.
pub(crate) const EDITOR_FIELDS: [(EditorField, &str); 3] = [
    (EditorField::Name, "Name"),
    (EditorField::Course, "Course"),
    (EditorField::Mobile, "Mobile"),
];

pub(crate) fn editor_title(editor: &RecordEditor) -> &'static str {
    match editor.mode() {
        EditorMode::Insert => "Add Student",
        EditorMode::Edit { .. } => "Edit Student",
    }
}

/// Render a single line of the editor popup. The course is shown between
/// arrows to hint that it is a choice, not a text box.
pub(crate) fn editor_line(editor: &RecordEditor, label: &str, field: EditorField) -> Line<'static> {
    let is_active = editor.active() == field;
    let value = match field {
        EditorField::Name => editor.name().to_string(),
        EditorField::Course => editor.course().to_string(),
        EditorField::Mobile => editor.mobile().to_string(),
    };

    let style = if is_active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let display = match field {
        EditorField::Course => format!("< {value} >"),
        _ if value.is_empty() => "<required>".to_string(),
        _ => value,
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Cursor column offset within the popup for the active field.
pub(crate) fn editor_cursor_offset(editor: &RecordEditor) -> (u16, u16) {
    let (row, label) = EDITOR_FIELDS
        .iter()
        .enumerate()
        .find(|(_, (field, _))| *field == editor.active())
        .map(|(row, (_, label))| (row, *label))
        .unwrap_or((0, "Name"));

    let prefix = format!("{label}: ").len();
    let value = match editor.active() {
        EditorField::Course => "< ".len() + editor.value_len(EditorField::Course),
        field => editor.value_len(field),
    };
    ((prefix + value) as u16, row as u16)
}

pub(crate) fn confirm_delete_lines(pending: &PendingDelete) -> Vec<Line<'static>> {
    vec![
        Line::from(format!(
            "Delete student #{} ({})?",
            pending.id, pending.name
        )),
        Line::from("This cannot be undone."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentRecord;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn blank_text_fields_show_placeholder() {
        let editor = RecordEditor::insert();
        assert_eq!(
            text(&editor_line(&editor, "Name", EditorField::Name)),
            "Name: <required>"
        );
        assert_eq!(
            text(&editor_line(&editor, "Course", EditorField::Course)),
            "Course: < Biology >"
        );
    }

    #[test]
    fn title_and_cursor_follow_editor_state() {
        let record = StudentRecord {
            id: 1,
            name: "Ann".into(),
            course: "Math".into(),
            mobile: "555-1".into(),
        };
        let mut editor = RecordEditor::edit(&record);
        assert_eq!(editor_title(&editor), "Edit Student");
        assert_eq!(editor_cursor_offset(&editor), (9, 0));

        editor.focus(EditorField::Mobile);
        assert_eq!(editor_cursor_offset(&editor), (13, 2));
    }
}
