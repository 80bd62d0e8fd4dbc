//! Layout helpers for the codechat TUI.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Regions of the chat screen, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatAreas {
    pub header: Rect,
    pub transcript: Rect,
    pub input: Rect,
    pub footer: Rect,
}

/// Split `area` into header, transcript, input bar and footer.
pub fn chat_layout(area: Rect, input_height: u16) -> ChatAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area);
    ChatAreas {
        header: chunks[0],
        transcript: chunks[1],
        input: chunks[2],
        footer: chunks[3],
    }
}

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
