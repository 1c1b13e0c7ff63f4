use std::collections::BTreeSet;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::db::RecordStore;
use crate::error::RosterError;
use crate::roster::{
    search, Committed, EditorField, EditorMode, PendingDelete, RecordEditor, RosterView,
    Selection, SelectionController,
};

use super::forms::{
    confirm_delete_lines, editor_cursor_offset, editor_line, editor_title, EDITOR_FIELDS,
};
use super::helpers::{centered_rect, describe_failure, key_legend};

const WINDOW_TITLE: &str = "Student Management System";
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const PAGE_STEP: isize = 10;

/// Modal states layered over the roster table.
enum Mode {
    Normal,
    Editing(RecordEditor),
    ConfirmDelete(PendingDelete),
    Searching(SearchState),
    About,
}

/// Query being typed into the search bar.
#[derive(Default)]
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    /// Sentence shown on the first footer line.
    text: String,
    /// Picks the footer colour.
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal shell around the roster controller. The store, view, and
/// selection are owned here and lent to the editor and controller per call.
pub struct App {
    /// Backing store; every write goes through it.
    store: Box<dyn RecordStore>,
    /// Snapshot the table is drawn from.
    view: RosterView,
    /// Row that edit and delete act on.
    selection: SelectionController,
    /// Row under the keyboard cursor. Moving it does not select anything;
    /// Enter/Space activates the row.
    cursor: usize,
    /// Rows matched by the last search. Purely visual.
    highlighted: BTreeSet<usize>,
    /// Dialog currently layered over the table, if any.
    mode: Mode,
    /// Outcome of the last action, cleared by Esc.
    status: Option<StatusMessage>,
}

impl App {
    /// Build the shell and load the initial snapshot.
    pub fn new(store: Box<dyn RecordStore>) -> Result<Self> {
        let mut view = RosterView::new();
        view.refresh(store.as_ref())?;
        info!(rows = view.len(), "roster loaded");

        Ok(Self {
            store,
            view,
            selection: SelectionController::new(),
            cursor: 0,
            highlighted: BTreeSet::new(),
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Editing(editor) => self.handle_editor(code, editor),
            Mode::ConfirmDelete(pending) => self.handle_confirm_delete(code, pending),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::About => Mode::Normal,
        };

        Ok(exit)
    }

    /// Ctrl+N mirrors the "File → Add Student" menu entry from any screen
    /// without an open dialog.
    pub(crate) fn handle_ctrl_n(&mut self) -> Result<()> {
        if matches!(self.mode, Mode::Normal) {
            self.mode = Mode::Editing(RecordEditor::insert());
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.highlighted.is_empty() {
                    *exit = true;
                } else {
                    self.highlighted.clear();
                    self.clear_status();
                }
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.move_cursor(PAGE_STEP),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.view.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_cursor_row(),
            KeyCode::Char('a') | KeyCode::Char('+') => {
                return Mode::Editing(RecordEditor::insert());
            }
            KeyCode::Char('e') => match self.selection.edit(&self.view) {
                Ok(editor) => return Mode::Editing(editor),
                Err(err) => self.report("Edit", &err),
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.selection.delete(&self.view) {
                Ok(pending) => return Mode::ConfirmDelete(pending),
                Err(err) => self.report("Delete", &err),
            },
            KeyCode::Char('/') => return Mode::Searching(SearchState::default()),
            KeyCode::Char('?') | KeyCode::F(1) => return Mode::About,
            KeyCode::Char('r') => {
                if let Err(err) = self.reload() {
                    self.report("Reload", &err);
                } else {
                    self.set_status("Roster reloaded.", StatusKind::Info);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_editor(&mut self, code: KeyCode, mut editor: RecordEditor) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status(
                    format!("{} cancelled.", editor_title(&editor)),
                    StatusKind::Info,
                );
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => editor.toggle_field(),
            KeyCode::BackTab | KeyCode::Up => editor.previous_field(),
            KeyCode::Right if editor.active() == EditorField::Course => editor.next_course(),
            KeyCode::Left if editor.active() == EditorField::Course => editor.previous_course(),
            KeyCode::Char(' ') if editor.active() == EditorField::Course => editor.next_course(),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Enter => return self.submit_editor(editor),
            KeyCode::Char(ch) => {
                editor.push_char(ch);
            }
            _ => {}
        }
        Mode::Editing(editor)
    }

    fn submit_editor(&mut self, mut editor: RecordEditor) -> Mode {
        let title = editor_title(&editor);
        match editor.submit(self.store.as_ref(), &mut self.view) {
            Ok(committed) => {
                let verb = match editor.mode() {
                    EditorMode::Insert => "Added",
                    EditorMode::Edit { .. } => "Updated",
                };
                if committed.refresh_error.is_none() {
                    if let Some(index) = self.view.position_of(committed.id) {
                        self.cursor = index;
                    }
                }
                self.finish_write(committed, format!("{verb} {}", editor.name().trim()));
                Mode::Normal
            }
            Err(err @ RosterError::NotFound { .. }) => {
                warn!(error = %err, "edited student vanished before save");
                self.set_status(describe_failure(title, &err), StatusKind::Warning);
                if let Err(reload_err) = self.reload() {
                    self.report("Reload", &reload_err);
                }
                Mode::Normal
            }
            Err(err) => {
                self.report(title, &err);
                Mode::Editing(editor)
            }
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, pending: PendingDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let name = pending.name.clone();
                match self
                    .selection
                    .confirm_delete(pending, self.store.as_ref(), &mut self.view)
                {
                    Ok(committed) => self.finish_write(committed, format!("Deleted {name}")),
                    Err(err @ RosterError::NotFound { .. }) => {
                        warn!(error = %err, "student already deleted");
                        self.set_status(describe_failure("Delete", &err), StatusKind::Warning);
                        if let Err(reload_err) = self.reload() {
                            self.report("Reload", &reload_err);
                        }
                    }
                    Err(err) => self.report("Delete", &err),
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(pending),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.highlighted.clear();
                return Mode::Normal;
            }
            KeyCode::Enter => {
                self.highlighted = search(&self.view, &state.query);
                match self.highlighted.first() {
                    Some(&first) => {
                        self.cursor = first;
                        self.set_status(
                            format!(
                                "{} match(es) for \"{}\".",
                                self.highlighted.len(),
                                state.query
                            ),
                            StatusKind::Info,
                        );
                    }
                    None => self.set_status(
                        format!("No student named \"{}\".", state.query),
                        StatusKind::Warning,
                    ),
                }
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }
        Mode::Searching(state)
    }

    /// Rebuild the snapshot from the store and re-anchor everything that
    /// points into it.
    fn reload(&mut self) -> Result<(), RosterError> {
        self.view.refresh(self.store.as_ref())?;
        self.after_refresh();
        Ok(())
    }

    /// Status for a write that reached the store. A failed refresh after it
    /// is only a warning: the dialog is closed either way so the write is
    /// never repeated.
    fn finish_write(&mut self, committed: Committed, done: String) {
        self.after_refresh();
        match committed.refresh_error {
            None => self.set_status(format!("{done}."), StatusKind::Info),
            Some(err) => self.set_status(
                format!("{done}, but the roster could not be reloaded: {err}"),
                StatusKind::Warning,
            ),
        }
    }

    fn after_refresh(&mut self) {
        self.selection.reconcile(&self.view);
        self.highlighted.clear();
        self.clamp_cursor();
    }

    fn activate_cursor_row(&mut self) {
        if self.view.is_empty() {
            self.set_status("No students yet. Press 'a' to add one.", StatusKind::Error);
            return;
        }
        match self.selection.activate(&self.view, self.cursor) {
            Ok(()) => {
                let name = self
                    .view
                    .row_at(self.cursor)
                    .map(|row| row.name.clone())
                    .unwrap_or_default();
                self.set_status(format!("Selected {name}."), StatusKind::Info);
            }
            Err(err) => self.report("Select", &err),
        }
    }

    fn move_cursor(&mut self, offset: isize) {
        if self.view.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.view.len() as isize - 1;
        self.cursor = (self.cursor as isize + offset).clamp(0, last) as usize;
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.view.len() {
            self.cursor = self.view.len().saturating_sub(1);
        }
    }

    fn report(&mut self, operation: &str, err: &RosterError) {
        warn!(operation, error = %err, "operation failed");
        self.set_status(describe_failure(operation, err), StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT.min(area.height)),
            ])
            .split(area);

        self.draw_menu_bar(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Editing(editor) => self.draw_editor(frame, area, editor),
            Mode::ConfirmDelete(pending) => self.draw_confirm_delete(frame, area, pending),
            Mode::Searching(state) => self.draw_search_bar(frame, chunks[1], state),
            Mode::About => self.draw_about(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_menu_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!(" {WINDOW_TITLE} "),
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )];
        spans.push(Span::raw("  File: "));
        spans.extend(key_legend(&[("^N", "Add Student")]).spans);
        spans.push(Span::raw("   Help: "));
        spans.extend(key_legend(&[("?", "About")]).spans);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Students");

        if self.view.is_empty() {
            let message = Paragraph::new("No students yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let selected = match self.selection.selection() {
            Selection::Row(index) => Some(index),
            Selection::None => None,
        };

        let header = Row::new(["ID", "Name", "Course", "Mobile"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.view.rows().iter().enumerate().map(|(index, record)| {
            let mut style = Style::default();
            if self.highlighted.contains(&index) {
                style = style.bg(Color::Blue);
            }
            if selected == Some(index) {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            }
            Row::new([
                Cell::from(record.id.to_string()),
                Cell::from(record.name.clone()),
                Cell::from(record.course.clone()),
                Cell::from(record.mobile.clone()),
            ])
            .style(style)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(40),
                Constraint::Length(12),
                Constraint::Percentage(30),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    /// Key legend for the current mode. Edit and delete only appear once a row
    /// has been selected.
    fn footer_instructions(&self) -> Line<'static> {
        match &self.mode {
            Mode::Editing(_) => key_legend(&[
                ("Tab", "Next field"),
                ("←→", "Course"),
                ("Enter", "Save"),
                ("Esc", "Cancel"),
            ]),
            Mode::ConfirmDelete(_) => key_legend(&[("y", "Delete"), ("n", "Keep")]),
            Mode::Searching(_) => key_legend(&[("Enter", "Find"), ("Esc", "Cancel")]),
            Mode::About => key_legend(&[("any key", "Close")]),
            Mode::Normal => {
                let mut entries = vec![
                    ("↑↓", "Move"),
                    ("Enter", "Select"),
                    ("a", "Add"),
                ];
                if self.selection.has_selection() {
                    entries.push(("e", "Edit"));
                    entries.push(("d", "Delete"));
                }
                entries.push(("/", "Search"));
                entries.push(("r", "Reload"));
                entries.push(("q", "Quit"));
                key_legend(&entries)
            }
        }
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect, editor: &RecordEditor) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(editor_title(editor))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = EDITOR_FIELDS
            .iter()
            .map(|(field, label)| editor_line(editor, label, *field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = editor.error() {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else if editor.can_submit() {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Name and mobile are required.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if editor.active() != EditorField::Course {
            let (dx, dy) = editor_cursor_offset(editor);
            frame.set_cursor_position((inner.x + dx, inner.y + dy));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let paragraph = Paragraph::new(confirm_delete_lines(pending))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search by name");
        let paragraph = Paragraph::new(Span::raw(format!("Name: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Name: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_about(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let lines = vec![
            Line::from(Span::styled(
                WINDOW_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
            Line::from(""),
            Line::from("Keep track of students, their courses, and how to reach them."),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("About").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
