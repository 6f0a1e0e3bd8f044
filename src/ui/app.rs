use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::error;

use crate::db::{StorageError, TodoRepository};
use crate::models::TodoId;
use crate::store::{LoadOutcome, TodoStore};

use super::forms::{EntryField, EntryForm, ADD_BUTTON_LABEL};
use super::helpers::{remaining_label, surface_error, todo_line};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Bordered single-line entry row.
const ENTRY_HEIGHT: u16 = 3;
/// Ticks a freshly added row stays highlighted.
const ENTER_TICKS: u8 = 4;
/// Ticks the decorative symbol stays next to the entry title after an add.
const SPARKLE_TICKS: u8 = 6;
/// Ticks an informational footer message survives.
const STATUS_TICKS: u8 = 12;
const SPARKLE: &str = "✦";

/// Which part of the screen receives keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Focus {
    Entry,
    List,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
    /// Remaining ticks for transient messages; errors stay until replaced.
    ttl: Option<u8>,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Cosmetic state for list changes. Nothing here affects the stored list.
#[derive(Default)]
struct Animation {
    entering: Option<(TodoId, u8)>,
    sparkle: u8,
}

impl Animation {
    fn added(&mut self, id: TodoId) {
        self.entering = Some((id, ENTER_TICKS));
        self.sparkle = SPARKLE_TICKS;
    }

    fn tick(&mut self) {
        self.entering = match self.entering {
            Some((id, ticks)) if ticks > 1 => Some((id, ticks - 1)),
            _ => None,
        };
        self.sparkle = self.sparkle.saturating_sub(1);
    }

    fn is_entering(&self, id: TodoId) -> bool {
        matches!(self.entering, Some((entering, _)) if entering == id)
    }
}

/// Central application state shared across the TUI.
pub struct App<R: TodoRepository> {
    store: TodoStore<R>,
    form: EntryForm,
    focus: Focus,
    selected: usize,
    status: Option<StatusMessage>,
    animation: Animation,
    /// Set by the store subscriber whenever the list changes.
    list_changed: Rc<Cell<bool>>,
}

impl<R: TodoRepository> App<R> {
    /// Wrap an already loaded store. `outcome` is what `TodoStore::load`
    /// reported so a recovered list can be announced in the footer.
    pub fn new(mut store: TodoStore<R>, outcome: LoadOutcome) -> Self {
        let list_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&list_changed);
        store.subscribe(move |_| flag.set(true));

        let mut app = Self {
            store,
            form: EntryForm::default(),
            focus: Focus::Entry,
            selected: 0,
            status: None,
            animation: Animation::default(),
            list_changed,
        };

        if outcome == LoadOutcome::Recovered {
            app.set_status(
                "Saved todos could not be read; starting with an empty list.",
                StatusKind::Error,
                None,
            );
        }
        app
    }

    /// The store backing the list, for read access.
    pub fn store(&self) -> &TodoStore<R> {
        &self.store
    }

    /// Process a key press. Returns `true` when the user asked to quit.
    ///
    /// Chords other than Shift are ignored; the terminal loop handles the
    /// few Ctrl shortcuts before keys reach this point.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return false;
        }
        let exit = match self.focus {
            Focus::Entry => self.handle_entry_key(key.code),
            Focus::List => self.handle_list_key(key.code),
        };
        self.sync_selection();
        exit
    }

    /// Clear the pending input from anywhere.
    pub(crate) fn handle_ctrl_u(&mut self) {
        self.store.input_mut().clear();
        self.form.reset();
        self.focus = Focus::Entry;
    }

    /// Advance animations and expire transient footer messages.
    pub fn tick(&mut self) {
        self.animation.tick();
        let expired = match self.status.as_mut() {
            Some(StatusMessage {
                ttl: Some(ttl), ..
            }) => {
                *ttl = ttl.saturating_sub(1);
                *ttl == 0
            }
            _ => false,
        };
        if expired {
            self.status = None;
        }
    }

    fn handle_entry_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => return true,
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => {
                if !self.form.advance() {
                    self.focus_list();
                }
            }
            KeyCode::BackTab => self.form.reset(),
            KeyCode::Down => self.focus_list(),
            KeyCode::Backspace => self.form.backspace(self.store.input_mut()),
            KeyCode::Char(ch) => {
                if self.form.push_char(self.store.input_mut(), ch) {
                    self.clear_error();
                }
            }
            _ => {}
        }
        false
    }

    fn handle_list_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.store.len().saturating_sub(1),
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('c') => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('i') | KeyCode::Char('a') => {
                self.focus = Focus::Entry;
                self.form.reset();
            }
            _ => {}
        }
        false
    }

    fn submit(&mut self) {
        let before = self.store.len();
        let result = self.store.submit();

        // A failed write still leaves the new row in the list.
        if self.store.len() > before {
            if let Some(todo) = self.store.todos().last() {
                self.animation.added(todo.id);
            }
            self.selected = self.store.len() - 1;
            self.form.reset();
        }

        match result {
            Ok(Some(_)) => self.clear_error(),
            Ok(None) => {}
            Err(err) => self.report(err),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status("No todo selected.", StatusKind::Error, Some(STATUS_TICKS));
            return;
        };
        if let Err(err) = self.store.toggle(id) {
            self.report(err);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status("No todo selected.", StatusKind::Error, Some(STATUS_TICKS));
            return;
        };
        match self.store.delete(id) {
            Ok(Some(removed)) => self.set_status(
                format!("Removed \"{}\".", removed.text.trim()),
                StatusKind::Info,
                Some(STATUS_TICKS),
            ),
            Ok(None) => {}
            Err(err) => self.report(err),
        }
    }

    fn selected_id(&self) -> Option<TodoId> {
        self.store.todos().get(self.selected).map(|todo| todo.id)
    }

    fn focus_list(&mut self) {
        self.form.reset();
        self.focus = Focus::List;
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    /// Keep the selection inside the list after the store reports a change.
    fn sync_selection(&mut self) {
        if self.list_changed.replace(false) {
            self.selected = self.selected.min(self.store.len().saturating_sub(1));
        }
    }

    fn report(&mut self, err: StorageError) {
        error!(error = %err, "failed to save todos");
        let message = surface_error(&err.into());
        self.set_status(
            format!("Could not save changes: {message}"),
            StatusKind::Error,
            None,
        );
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind, ttl: Option<u8>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            ttl,
        });
    }

    fn clear_error(&mut self) {
        if matches!(
            self.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ) {
            self.status = None;
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(ENTRY_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_entry(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Entry;
        let mut title = vec![Span::raw(" New todo ")];
        if self.animation.sparkle > 0 {
            title.push(Span::styled(
                format!("{SPARKLE} "),
                Style::default().fg(Color::Yellow),
            ));
        }
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(title));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let button_width = ADD_BUTTON_LABEL.len() as u16 + 1;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(button_width)])
            .split(inner);

        let input = self.store.input();
        let input_width = EntryForm::cursor_offset(input);
        // Keep the end of long input, and the cursor after it, in view.
        let scroll = input_width.saturating_sub(columns[0].width.saturating_sub(1));
        frame.render_widget(
            Paragraph::new(self.form.build_line(input, focused)).scroll((0, scroll)),
            columns[0],
        );
        frame.render_widget(
            Paragraph::new(self.form.build_button(focused)).alignment(Alignment::Right),
            columns[1],
        );

        if focused && self.form.active == EntryField::Text {
            let max_x = columns[0].x + columns[0].width.saturating_sub(1);
            let cursor_x = (columns[0].x + input_width - scroll).min(max_x);
            frame.set_cursor_position((cursor_x, columns[0].y));
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::List;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            })
            .title(" Todos ");

        if self.store.is_empty() {
            frame.render_widget(block.clone(), area);
            let message = Paragraph::new("Nothing to do. Type above and press Enter.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(message, block.inner(area));
            return;
        }

        let items: Vec<ListItem> = self
            .store
            .todos()
            .iter()
            .map(|todo| ListItem::new(todo_line(todo, self.animation.is_entering(todo.id))))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_symbol("> ")
            .highlight_style(if focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            });

        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
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

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints = match self.focus {
            Focus::Entry => "Enter add • Tab next • Ctrl+U clear • Esc quit",
            Focus::List => "Space toggle • d delete • Tab new todo • q quit",
        };
        let counter = remaining_label(self.store.remaining(), self.store.len());
        Line::from(vec![
            Span::styled(hints, Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(counter, Style::default().fg(Color::Cyan)),
        ])
    }
}
