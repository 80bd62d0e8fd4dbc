//! Screen composition for the codechat TUI.

mod chat;
mod help;
mod layout;

pub use chat::render_chat;
