//! Text wrapping for styled ratatui Lines.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

/// Wrap Lines to fit within `width` columns, preserving span styles.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

fn display_width(line: &Line<'_>) -> usize {
    line.spans.iter().map(|s| s.content.width()).sum()
}

/// Wrap a single Line. Break points come from textwrap on the plain text;
/// styles are then re-applied character by character.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if display_width(&line) <= width {
        return vec![line];
    }

    let styled: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut idx = 0;

    for piece in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace at break points
        while idx < styled.len() && styled[idx].0.is_whitespace() && !piece.starts_with(styled[idx].0) {
            idx += 1;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_style: Option<Style> = None;

        for expected in piece.chars() {
            let (ch, style) = styled.get(idx).copied().unwrap_or((expected, Style::default()));
            idx += 1;

            if let Some(s) = run_style.filter(|s| *s != style) {
                spans.push(Span::styled(std::mem::take(&mut run), s));
            }
            run_style = Some(style);
            run.push(ch);
        }

        if let Some(s) = run_style {
            spans.push(Span::styled(run, s));
        }
        if !spans.is_empty() {
            result.push(Line::from(spans));
        }
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }
    result
}
