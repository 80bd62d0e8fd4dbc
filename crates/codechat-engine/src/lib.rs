//! codechat-engine: Headless core of the codechat coding assistant
//!
//! This crate provides everything except the terminal surface:
//! - Message types and the append-only transcript
//! - The conversation controller and its turn state machine
//! - The message formatter splitting text into prose and code segments
//! - The responder trait and the canned keyword responder
//! - Configuration loading

pub mod chat;
pub mod config;
pub mod conversation;
pub mod format;
pub mod responder;

// Re-export commonly used types
pub use chat::{Message, MessageId, Role, GREETING_ID};
pub use config::{Config, ConfigError};
pub use conversation::{spawn_turn, Conversation, PendingResponse, Revision, Session, Turn, TurnState};
pub use format::{code_blocks, format_message, reassemble, Segment, SegmentKind};
pub use responder::{canned_reply, CannedResponder, Responder, ResponseFailure};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Most recent code block in `transcript`, newest message first.
pub fn last_code_block(transcript: &[Message]) -> Option<Segment<'_>> {
    transcript
        .iter()
        .rev()
        .find_map(|message| code_blocks(&message.content).last())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_version() {
        let version = engine_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_last_code_block() {
        let transcript = vec![
            Message::assistant(1, "```a\nfirst```"),
            Message::user(2, "```b\nsecond``` and ```c\nthird```"),
            Message::assistant(3, "no code"),
        ];
        let block = last_code_block(&transcript).unwrap();
        assert_eq!(block.text, "third");
        assert_eq!(block.language(), Some("c"));

        assert!(last_code_block(&transcript[2..]).is_none());
    }
}
