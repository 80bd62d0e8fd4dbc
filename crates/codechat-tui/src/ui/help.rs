//! Keybinding help overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use super::layout::centered_fixed;
use crate::theme::Theme;

const HELP_TEXT: &str = r"
  Conversation
    Enter             Send message
    Ctrl+J            Insert newline
    Up/Down           History (empty input)

  Transcript
    Up/Down           Scroll
    PgUp/PgDn         Scroll a page
    Ctrl+Y            Copy last code block

  F1                  Toggle this help
  Esc / Ctrl+C        Quit

  [Press any key to close]
";

/// Draw the help overlay centered over `area`.
pub fn render_help_overlay(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let width = 46.min(area.width.saturating_sub(4));
    let height = 18.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface).fg(theme.text));

    Paragraph::new(HELP_TEXT)
        .block(block)
        .render(overlay_area, buf);
}
