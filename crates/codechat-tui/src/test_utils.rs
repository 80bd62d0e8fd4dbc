//! Test utilities for codechat-tui snapshot and rendering tests.

use std::sync::Arc;

use codechat_engine::{CannedResponder, Conversation, Session};
use ratatui::{backend::TestBackend, buffer::Buffer, text::Line, Terminal};

use crate::app::App;
use crate::theme::Theme;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app whose responder answers immediately.
pub fn create_test_app() -> App {
    let session = Session::new(Conversation::default(), Arc::new(CannedResponder::instant()));
    App::new(session, Theme::default())
}

/// Render the full chat screen into a string.
pub fn render_app_to_string(app: &App, width: u16, height: u16) -> String {
    let mut terminal = create_test_terminal_sized(width, height);
    terminal
        .draw(|frame| {
            crate::ui::render_chat(app, frame.area(), frame.buffer_mut());
        })
        .expect("Failed to draw");
    buffer_to_string(terminal.backend().buffer())
}

/// Draw the chat screen and apply its scroll limit, as the run loop does.
pub fn draw_app(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = create_test_terminal_sized(width, height);
    let mut max_scroll = 0;
    terminal
        .draw(|frame| {
            max_scroll = crate::ui::render_chat(app, frame.area(), frame.buffer_mut());
        })
        .expect("Failed to draw");
    app.set_scroll_limit(max_scroll);
    buffer_to_string(terminal.backend().buffer())
}

/// Convert a buffer to a string, one row per line, trailing spaces trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut rows = Vec::with_capacity(area.height as usize);

    for y in area.y..area.y + area.height {
        let mut row = String::new();
        for x in area.x..area.x + area.width {
            row.push_str(buffer[(x, y)].symbol());
        }
        rows.push(row.trim_end().to_string());
    }

    rows.join("\n")
}

/// Concatenate the span contents of `lines`, one line per row.
pub fn lines_to_string(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;
    use ratatui::text::Span;

    #[test]
    fn test_buffer_to_string_trims_rows() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 6, 2));
        buffer.set_string(0, 0, "ab", ratatui::style::Style::default());
        assert_eq!(buffer_to_string(&buffer), "ab\n");
    }

    #[test]
    fn test_lines_to_string_joins_spans() {
        let lines = vec![
            Line::from(vec![Span::raw("a"), Span::raw("b")]),
            Line::from("c"),
        ];
        assert_eq!(lines_to_string(&lines), "ab\nc");
    }

    #[test]
    fn test_create_test_app_has_greeting() {
        let app = create_test_app();
        assert_eq!(app.conversation().transcript().len(), 1);
        assert!(!app.is_pending());
    }
}
