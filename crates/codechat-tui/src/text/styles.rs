//! Styles for message content, derived from the active theme.

use ratatui::style::{Modifier, Style};

use crate::theme::Theme;

/// How prose and code elements of a message are painted.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    pub text: Style,
    /// `#` headings.
    pub heading: Style,
    /// `##` and deeper headings.
    pub subheading: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub link: Style,
    /// Quoted lines, including the `> ` prefix.
    pub quote: Style,
    /// Bullets, list numbers and rules.
    pub marker: Style,
    /// Inline `code` spans.
    pub inline_code: Style,
    /// Lines inside a code block.
    pub code_block: Style,
    /// The frame and language label around a fenced block.
    pub code_frame: Style,
}

impl MarkdownStyles {
    /// Derive message styles from `theme`.
    pub fn from_theme(theme: &Theme) -> Self {
        let code = Style::default().fg(theme.secondary).bg(theme.surface);
        Self {
            text: Style::default().fg(theme.text),
            heading: Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
            subheading: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::BOLD),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            link: Style::default()
                .fg(theme.info)
                .add_modifier(Modifier::UNDERLINED),
            quote: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::ITALIC),
            marker: Style::default().fg(theme.muted),
            inline_code: code,
            code_block: code,
            code_frame: Style::default().fg(theme.muted),
        }
    }
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}
