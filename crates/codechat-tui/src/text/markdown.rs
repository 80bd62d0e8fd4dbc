//! Prose rendering using pulldown-cmark.
//!
//! Provides [`render_prose`] to convert the prose segments of a message to
//! styled ratatui Lines. Fenced code never reaches this renderer: the engine's
//! formatter splits it out beforehand.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::styles::MarkdownStyles;

/// Render prose to styled ratatui Lines.
///
/// Line breaks inside a paragraph are kept, so text reads the way it was
/// typed. Trailing blank lines are dropped.
pub fn render_prose(input: &str, styles: &MarkdownStyles) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(input, options);

    let mut renderer = ProseRenderer::new(styles.clone());
    renderer.run(parser);

    let mut lines = renderer.lines;
    while lines.last().is_some_and(|line| line.width() == 0) {
        lines.pop();
    }
    lines
}

/// Internal renderer that processes pulldown-cmark events.
struct ProseRenderer {
    /// Accumulated output lines.
    lines: Vec<Line<'static>>,
    styles: MarkdownStyles,
    /// Stack of active styles for nested formatting.
    style_stack: Vec<Style>,
    /// Current line being built.
    current_spans: Vec<Span<'static>>,
    /// One entry per open list: next number for ordered lists, `None` for bullets.
    list_stack: Vec<Option<u64>>,
    in_code_block: bool,
    in_blockquote: bool,
    /// Pending list marker to prepend to next text.
    pending_list_marker: Option<String>,
}

impl ProseRenderer {
    fn new(styles: MarkdownStyles) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            in_code_block: false,
            in_blockquote: false,
            pending_list_marker: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
            }

            Event::Start(Tag::Emphasis) => self.style_stack.push(self.styles.emphasis),
            Event::Start(Tag::Strong) => self.style_stack.push(self.styles.strong),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(self.styles.strikethrough),
            Event::Start(Tag::Link { .. }) => self.style_stack.push(self.styles.link),
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link) => {
                self.style_stack.pop();
            }

            // Indented code blocks (fenced ones are split out earlier)
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                self.pending_list_marker = Some(self.next_list_marker());
            }
            Event::End(TagEnd::Item) => self.flush_line(),

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.lines.push(Line::from(""));
                }
            }

            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                self.take_list_marker();
                self.current_spans
                    .push(Span::styled(format!("`{code}`"), self.styles.inline_code));
            }

            Event::SoftBreak | Event::HardBreak => self.flush_line(),

            Event::Rule => {
                self.flush_line();
                self.lines
                    .push(Line::from(Span::styled("───", self.styles.marker)));
            }

            _ => {}
        }
    }

    fn next_list_marker(&mut self) -> String {
        let depth = self.list_stack.len().saturating_sub(1);
        let indent = "  ".repeat(depth);
        match self.list_stack.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{indent}{n}. ");
                *n += 1;
                marker
            }
            _ => format!("{indent}• "),
        }
    }

    fn take_list_marker(&mut self) {
        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.marker));
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.current_spans
                    .push(Span::styled(format!("  {line}"), self.styles.code_block));
                self.flush_line();
            }
            return;
        }

        self.take_list_marker();

        if self.in_blockquote && self.current_spans.is_empty() {
            self.current_spans
                .push(Span::styled("> ".to_string(), self.styles.quote));
        }

        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .iter()
            .fold(self.styles.text, |style, s| style.patch(*s))
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.heading,
            _ => self.styles.subheading,
        }
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }
}
