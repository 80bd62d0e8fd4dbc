//! Chat message types.
//!
//! Messages are immutable once created: the transcript only ever grows by
//! appending new [`Message`] values.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{format_message, Segment};

/// Identifier of a message. Strictly increasing in creation order.
pub type MessageId = u64;

/// Id reserved for the greeting that opens every session.
pub const GREETING_ID: MessageId = 1;

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user.
    User,
    /// Reply produced by the responder (or the greeting / fallback text).
    Assistant,
}

impl Role {
    /// Label shown next to the message in render surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique, monotonically increasing id.
    pub id: MessageId,
    /// Role of the message author.
    pub role: Role,
    /// Raw message text, possibly containing fenced code blocks.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user message stamped with the current time.
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Create a new assistant message stamped with the current time.
    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Split the content into prose and code segments.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        format_message(&self.content)
    }

    /// Local wall-clock time of the message as `HH:MM`.
    ///
    /// Derived from `created_at` on every call.
    pub fn display_time(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let user_msg = Message::user(2, "Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");
        assert_eq!(user_msg.id, 2);

        let assistant_msg = Message::assistant(3, "Hi there!");
        assert_eq!(assistant_msg.role, Role::Assistant);
        assert!(assistant_msg.created_at >= user_msg.created_at);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_display_time_format() {
        let msg = Message::user(2, "x");
        let time = msg.display_time();
        assert_eq!(time.len(), 5);
        assert_eq!(time.as_bytes()[2], b':');
    }

    #[test]
    fn test_segments_borrow_content() {
        let msg = Message::assistant(2, "See:\n```rust\nfn main() {}\n```");
        let segments = msg.segments();
        assert_eq!(segments.len(), 2);
        assert!(segments[1].is_code());
    }
}
