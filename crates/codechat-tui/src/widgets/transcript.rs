//! Transcript view.
//!
//! Renders every message as a header line (author and time) followed by its
//! segments: prose through the markdown renderer, code blocks framed with
//! their language.
//!
//! ```text
//! Assistant · 14:02
//! Here's a Python algorithm example:
//! ┌─ python
//! │ def binary_search(arr, target):
//! └─
//! ```

use codechat_engine::{Message, Role, Segment, SegmentKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::text::{render_prose, wrap_lines, MarkdownStyles};
use crate::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Build the styled lines for `messages`, plus a busy line when `pending`.
pub fn transcript_lines(
    messages: &[Message],
    pending: bool,
    tick: usize,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let styles = MarkdownStyles::from_theme(theme);
    let mut lines = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(header_line(message, theme));
        for segment in message.segments() {
            match segment.kind {
                SegmentKind::Text => {
                    lines.extend(wrap_lines(render_prose(segment.text, &styles), width));
                }
                SegmentKind::Code { language } => {
                    lines.extend(code_lines(&segment, language, &styles));
                }
            }
        }
    }

    if pending {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                SPINNER[tick % SPINNER.len()],
                Style::default().fg(theme.assistant),
            ),
            Span::styled(" Thinking...", Style::default().fg(theme.muted)),
        ]));
    }

    lines
}

fn header_line(message: &Message, theme: &Theme) -> Line<'static> {
    let color = match message.role {
        Role::User => theme.user,
        Role::Assistant => theme.assistant,
    };
    Line::from(vec![
        Span::styled(
            message.role.label(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {}", message.display_time()),
            Style::default().fg(theme.muted),
        ),
    ])
}

fn code_lines(segment: &Segment<'_>, language: &str, styles: &MarkdownStyles) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("┌─ {language}"),
        styles.code_frame,
    ))];
    for code in segment.text.lines() {
        lines.push(Line::from(vec![
            Span::styled("│ ", styles.code_frame),
            Span::styled(code.to_string(), styles.code_block),
        ]));
    }
    lines.push(Line::from(Span::styled("└─", styles.code_frame)));
    lines
}

/// Scrollable transcript pane.
pub struct TranscriptView<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    pending: bool,
    tick: usize,
    scroll_from_bottom: usize,
}

impl<'a> TranscriptView<'a> {
    /// Create a new transcript view.
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            pending: false,
            tick: 0,
            scroll_from_bottom: 0,
        }
    }

    /// Show the busy indicator, animated by `tick`.
    #[must_use]
    pub fn pending(mut self, pending: bool, tick: usize) -> Self {
        self.pending = pending;
        self.tick = tick;
        self
    }

    /// Lines scrolled up from the newest content (0 follows the bottom).
    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    /// Largest useful scroll offset when drawn into `area`.
    pub fn max_scroll(&self, area: Rect) -> usize {
        let inner = self.block().inner(area);
        self.lines(inner.width).len().saturating_sub(inner.height as usize)
    }

    fn block(&self) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base))
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        transcript_lines(
            self.messages,
            self.pending,
            self.tick,
            width as usize,
            self.theme,
        )
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.lines(inner.width);

        let visible = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(visible);
        let top = max_scroll - self.scroll_from_bottom.min(max_scroll);

        Paragraph::new(lines)
            .style(Style::default().fg(self.theme.text))
            .scroll((top.min(u16::MAX as usize) as u16, 0))
            .render(inner, buf);
    }
}
