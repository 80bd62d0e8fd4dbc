//! The chat screen: header, transcript, input bar and footer.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::help::render_help_overlay;
use super::layout::chat_layout;
use crate::app::App;
use crate::theme::Theme;
use crate::widgets::{InputBar, TranscriptView};

const TITLE: &str = "Coding Assistant";
const SUBTITLE: &str = "Ask me anything about programming";

const HINTS: &[(&str, &str)] = &[
    ("Enter", "send"),
    ("Ctrl+J", "newline"),
    ("Ctrl+Y", "copy code"),
    ("F1", "help"),
    ("Esc", "quit"),
];

/// Draw the whole chat screen, plus the help overlay when it is open.
///
/// Returns the transcript's largest useful scroll offset for this frame.
pub fn render_chat(app: &App, area: Rect, buf: &mut Buffer) -> usize {
    let theme = &app.theme;
    let input_height = InputBar::height_for(&app.input_state, area.height / 3);
    let areas = chat_layout(area, input_height.max(3));

    buf.set_style(area, Style::default().bg(theme.base));

    Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(theme.subtext))),
    ])
    .render(areas.header, buf);

    let conversation = app.conversation();
    let transcript = TranscriptView::new(conversation.transcript(), theme)
        .pending(conversation.is_pending(), app.tick)
        .scroll_from_bottom(app.scroll_from_bottom);
    let max_scroll = transcript.max_scroll(areas.transcript);
    transcript.render(areas.transcript, buf);

    InputBar::new(&app.input_state, theme)
        .disabled(app.is_pending())
        .render(areas.input, buf);

    footer_line(app.notification.as_deref(), theme).render(areas.footer, buf);

    if app.show_help {
        render_help_overlay(area, buf, theme);
    }

    max_scroll
}

fn footer_line<'a>(notification: Option<&'a str>, theme: &Theme) -> Line<'a> {
    if let Some(msg) = notification {
        return Line::from(Span::styled(msg, Style::default().fg(theme.info)));
    }

    let mut spans = Vec::with_capacity(HINTS.len() * 3);
    for (i, (key, action)) in HINTS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(theme.border)));
        }
        spans.push(Span::styled(format!("[{key}]"), Style::default().fg(theme.secondary)));
        spans.push(Span::styled(format!(" {action}"), Style::default().fg(theme.muted)));
    }
    Line::from(spans)
}
