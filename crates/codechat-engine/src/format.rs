//! Message formatting: splitting chat text into prose and code segments.
//!
//! A fenced region starts with three backticks, optionally followed on the
//! same line by a bare language tag and a single newline, and ends at the
//! next three backticks. Everything outside fenced regions is prose.
//!
//! ```text
//! before```js\ncode\n```after
//! └─────┘└──────────────┘└───┘
//!  text        code       text
//! ```

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// The fence marker delimiting code blocks.
pub const FENCE: &str = "```";

/// Language reported for code blocks without a tag.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Fenced block pattern: optional language tag, optional newline, lazy body.
static FENCED_BLOCK: OnceLock<Regex> = OnceLock::new();

fn fenced_block() -> &'static Regex {
    FENCED_BLOCK.get_or_init(|| {
        Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n?(.*?)```").expect("fence pattern is valid")
    })
}

/// Kind of a formatted segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SegmentKind<'a> {
    /// Prose outside any fenced region.
    Text,
    /// Body of a fenced region.
    Code {
        /// Language tag, or [`DEFAULT_LANGUAGE`] when absent.
        language: &'a str,
    },
}

/// A typed chunk of message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment<'a> {
    #[serde(flatten)]
    pub kind: SegmentKind<'a>,
    /// Literal content of the segment (fence markers and tag excluded).
    pub text: &'a str,
    /// Byte range in the source covered by this segment, markers included.
    pub span: Range<usize>,
}

impl<'a> Segment<'a> {
    fn text(source: &'a str, span: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::Text,
            text: &source[span.clone()],
            span,
        }
    }

    /// Whether this segment is a fenced code block.
    pub fn is_code(&self) -> bool {
        matches!(self.kind, SegmentKind::Code { .. })
    }

    /// Language of a code segment, `None` for prose.
    pub fn language(&self) -> Option<&'a str> {
        match self.kind {
            SegmentKind::Code { language } => Some(language),
            SegmentKind::Text => None,
        }
    }
}

/// Split `content` into prose and code segments in document order.
///
/// Zero-length prose is never emitted. An opening fence without a matching
/// closing fence is left in the prose, so no input text is ever dropped.
pub fn format_message(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in fenced_block().captures_iter(content) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(2)) else {
            continue;
        };

        if whole.start() > cursor {
            segments.push(Segment::text(content, cursor..whole.start()));
        }

        let language = caps.get(1).map_or(DEFAULT_LANGUAGE, |tag| tag.as_str());
        segments.push(Segment {
            kind: SegmentKind::Code { language },
            text: body.as_str(),
            span: whole.range(),
        });
        cursor = whole.end();
    }

    if cursor < content.len() {
        segments.push(Segment::text(content, cursor..content.len()));
    }

    segments
}

/// Iterate over the code segments of `content`.
pub fn code_blocks(content: &str) -> impl Iterator<Item = Segment<'_>> {
    format_message(content).into_iter().filter(Segment::is_code)
}

/// Rebuild the source text from its segments.
///
/// Because segment spans are contiguous and include fence markers, the
/// result equals the text `segments` was produced from.
pub fn reassemble(source: &str, segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|segment| &source[segment.span.clone()])
        .collect()
}
