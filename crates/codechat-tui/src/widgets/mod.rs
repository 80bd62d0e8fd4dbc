//! Widgets for the chat screen.

mod input_bar;
mod text_input;
mod transcript;

pub use input_bar::InputBar;
pub use text_input::TextInputState;
pub use transcript::TranscriptView;
