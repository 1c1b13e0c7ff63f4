use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::error::RosterError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Status-line text naming the operation that failed.
pub(crate) fn describe_failure(operation: &str, err: &RosterError) -> String {
    match err {
        RosterError::Validation(_) | RosterError::InvalidState(_) => err.to_string(),
        _ => format!("{operation} failed: {err}"),
    }
}

/// Render `[key] Label` pairs separated by spacing, as used in the footer and
/// the menu bar.
pub(crate) fn key_legend(entries: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (idx, (key, label)) in entries.iter().enumerate() {
        spans.push(Span::styled(format!("[{key}]"), key_style));
        if idx + 1 == entries.len() {
            spans.push(Span::raw(format!(" {label}")));
        } else {
            spans.push(Span::raw(format!(" {label}   ")));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_name_the_operation_for_storage_errors() {
        let err = RosterError::NotFound { id: 4 };
        assert_eq!(
            describe_failure("Delete", &err),
            "Delete failed: Student #4 no longer exists."
        );

        let err = RosterError::Validation("Name is required.".into());
        assert_eq!(describe_failure("Save", &err), "Name is required.");
    }

    #[test]
    fn legend_alternates_keys_and_labels() {
        let line = key_legend(&[("a", "Add"), ("q", "Quit")]);
        let text: String = line.spans.iter().map(|span| span.content.to_string()).collect();
        assert_eq!(text, "[a] Add   [q] Quit");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!((59..=61).contains(&popup.width));
        assert!((19..=21).contains(&popup.height));
        assert!(popup.right() <= area.right() && popup.bottom() <= area.bottom());
    }
}
