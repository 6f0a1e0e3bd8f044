use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Placeholder shown while the input is empty.
const PLACEHOLDER: &str = "Add a new todo...";
/// Label of the add control rendered beside the input.
pub(crate) const ADD_BUTTON_LABEL: &str = "[ + ]";

/// Parts of the entry form that can hold focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum EntryField {
    #[default]
    Text,
    AddButton,
}

/// Focus and editing rules for the new-todo entry row. The text itself lives
/// in the store's pending input; the form only decides what a key does to it.
#[derive(Default, Clone)]
pub(crate) struct EntryForm {
    pub(crate) active: EntryField,
}

impl EntryForm {
    /// Move focus from the text box to the add control. Returns `false` when
    /// focus is already on the add control and should leave the form.
    pub(crate) fn advance(&mut self) -> bool {
        match self.active {
            EntryField::Text => {
                self.active = EntryField::AddButton;
                true
            }
            EntryField::AddButton => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.active = EntryField::Text;
    }

    /// Append a character to the input when the text box has focus. Control
    /// characters are refused.
    pub(crate) fn push_char(&self, input: &mut String, ch: char) -> bool {
        if self.active != EntryField::Text || ch.is_control() {
            return false;
        }
        input.push(ch);
        true
    }

    /// Remove the last character from the input.
    pub(crate) fn backspace(&self, input: &mut String) {
        if self.active == EntryField::Text {
            input.pop();
        }
    }

    /// Render the input text, or the placeholder when it is empty.
    pub(crate) fn build_line(&self, input: &str, focused: bool) -> Line<'static> {
        if input.is_empty() {
            return Line::from(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ));
        }

        let style = if focused && self.active == EntryField::Text {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(Span::styled(input.to_string(), style))
    }

    /// Render the add control, reversed while it holds focus.
    pub(crate) fn build_button(&self, focused: bool) -> Line<'static> {
        let style = if focused && self.active == EntryField::AddButton {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        Line::from(Span::styled(ADD_BUTTON_LABEL, style))
    }

    /// Display width of the input, i.e. the cursor column inside the text box.
    pub(crate) fn cursor_offset(input: &str) -> u16 {
        u16::try_from(Span::raw(input).width()).unwrap_or(u16::MAX)
    }
}
