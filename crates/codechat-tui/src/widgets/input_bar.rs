//! Full-width input bar widget.
//!
//! Always visible at the bottom of the screen for text entry. Disabled while
//! a response is in flight.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::Theme;

use super::text_input::TextInputState;

/// Placeholder shown while the input is empty.
pub const PLACEHOLDER: &str =
    "Ask a coding question... (e.g., 'How do I implement a binary search in Python?')";

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    theme: &'a Theme,
    disabled: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            disabled: false,
        }
    }

    /// Disable editing (a response is pending).
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Rows needed to show the whole input, borders included.
    #[allow(clippy::cast_possible_truncation)]
    pub fn height_for(input: &TextInputState, max: u16) -> u16 {
        let lines = input.content().split('\n').count().max(1) as u16;
        (lines + 2).min(max)
    }

    /// Build Lines for multi-line input display.
    /// Returns the lines to display and which line index contains the cursor.
    fn build_input_lines(&self) -> (Vec<Line<'static>>, usize) {
        let content = self.input.content();
        let cursor_pos = self.input.cursor;

        let text_lines: Vec<&str> = content.split('\n').collect();

        // Locate the cursor as (line, column) in characters
        let mut consumed = 0;
        let mut cursor_line = 0;
        let mut cursor_col = 0;
        for (line_idx, line) in text_lines.iter().enumerate() {
            let len = line.chars().count();
            cursor_line = line_idx;
            if cursor_pos <= consumed + len {
                cursor_col = cursor_pos - consumed;
                break;
            }
            consumed += len + 1;
        }

        let lines = text_lines
            .iter()
            .enumerate()
            .map(|(line_idx, line_text)| {
                let prefix = if line_idx == 0 { "> " } else { "  " };
                if line_idx != cursor_line {
                    return Line::from(format!("{prefix}{line_text}"));
                }
                let before: String = line_text.chars().take(cursor_col).collect();
                let after: String = line_text.chars().skip(cursor_col).collect();
                Line::from(vec![
                    Span::raw(prefix.to_string()),
                    Span::raw(before),
                    Span::styled("█", Style::default().fg(self.theme.primary)),
                    Span::raw(after),
                ])
            })
            .collect();

        (lines, cursor_line)
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.disabled {
            Style::default().fg(self.theme.border)
        } else {
            Style::default().fg(self.theme.border_focused)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner_height = area.height.saturating_sub(2) as usize;

        let paragraph = if self.disabled {
            Paragraph::new("● Waiting for the assistant...")
                .block(block)
                .style(Style::default().fg(self.theme.muted))
        } else if self.input.is_empty() {
            let line = Line::from(vec![
                Span::raw("> "),
                Span::styled("█", Style::default().fg(self.theme.primary)),
                Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)),
            ]);
            Paragraph::new(line).block(block)
        } else {
            let (lines, cursor_line) = self.build_input_lines();

            // Keep the cursor line visible
            let scroll_offset = if lines.len() <= inner_height {
                0
            } else {
                cursor_line.saturating_sub(inner_height.saturating_sub(1))
            };

            Paragraph::new(lines)
                .block(block)
                .style(Style::default().fg(self.theme.text))
                .scroll((scroll_offset as u16, 0))
        };

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(input: &TextInputState, disabled: bool) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        InputBar::new(input, &theme).disabled(disabled).render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_placeholder_when_empty() {
        let out = render(&TextInputState::new(), false);
        assert!(out.contains("> █Ask a coding question"));
    }

    #[test]
    fn test_cursor_inside_text() {
        let mut input = TextInputState::new();
        input.insert_str("abc");
        input.move_left();
        let out = render(&input, false);
        assert!(out.contains("> ab█c"));
    }

    #[test]
    fn test_multiline_prefixes() {
        let mut input = TextInputState::new();
        input.insert_str("one\ntwo");
        let out = render(&input, false);
        assert!(out.contains("│> one"));
        assert!(out.contains("│  two█"));
    }

    #[test]
    fn test_disabled_shows_waiting() {
        let mut input = TextInputState::new();
        input.insert_str("typed");
        let out = render(&input, true);
        assert!(out.contains("Waiting for the assistant"));
        assert!(!out.contains("typed"));
    }

    #[test]
    fn test_height_for() {
        let mut input = TextInputState::new();
        assert_eq!(InputBar::height_for(&input, 8), 3);
        input.insert_str("a\nb\nc");
        assert_eq!(InputBar::height_for(&input, 8), 5);
        input.insert_str("\nd\ne\nf\ng");
        assert_eq!(InputBar::height_for(&input, 8), 8);
    }
}
