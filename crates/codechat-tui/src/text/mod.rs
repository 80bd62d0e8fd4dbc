//! Text rendering utilities.
//!
//! - [`render_prose`] - Render the prose parts of a message to styled Lines
//! - [`MarkdownStyles`] - Style configuration for prose and code
//! - [`wrap_lines`] - Wrap styled Lines to a width

mod markdown;
mod styles;
mod wrap;

pub use markdown::render_prose;
pub use styles::MarkdownStyles;
pub use wrap::wrap_lines;
