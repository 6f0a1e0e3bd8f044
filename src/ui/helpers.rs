use anyhow::Error;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Todo;

/// Build the row for one record: a checkbox followed by the text, struck
/// through once completed. `entering` marks a row that was just added.
pub(crate) fn todo_line(todo: &Todo, entering: bool) -> Line<'static> {
    let checkbox = if todo.completed { "[x] " } else { "[ ] " };

    let text_style = if todo.completed {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if entering {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let checkbox_style = if todo.completed {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Gray)
    };

    Line::from(vec![
        Span::styled(checkbox, checkbox_style),
        Span::styled(todo.text.clone(), text_style),
    ])
}

/// "2 of 5 remaining", or a short message for an empty list.
pub(crate) fn remaining_label(remaining: usize, total: usize) -> String {
    if total == 0 {
        "no todos".to_string()
    } else if remaining == 0 {
        format!("all {total} done")
    } else {
        format!("{remaining} of {total} remaining")
    }
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_label_variants() {
        assert_eq!(remaining_label(0, 0), "no todos");
        assert_eq!(remaining_label(0, 3), "all 3 done");
        assert_eq!(remaining_label(2, 5), "2 of 5 remaining");
    }

    #[test]
    fn completed_rows_are_checked_and_struck() {
        let mut todo = Todo::new("buy milk");
        todo.toggle();

        let line = todo_line(&todo, false);

        assert_eq!(line.spans[0].content, "[x] ");
        assert!(line.spans[1]
            .style
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow::anyhow!("disk full").context("failed to save todos");
        assert_eq!(surface_error(&err), "disk full");
    }
}
