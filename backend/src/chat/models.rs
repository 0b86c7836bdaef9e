//! Chat data models
//!
//! Defines messages, senders and the events a transcript emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, monotonically increasing message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    /// Allocate the next identifier
    pub fn next() -> Self {
        Self(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user
    User,
    /// Canned reply from the assistant
    Bot,
}

impl Sender {
    /// Convert the sender to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// A single message in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, ordered by creation
    pub id: MessageId,
    /// Text exactly as entered or configured; newlines are preserved
    pub content: String,
    /// Author of the message
    pub sender: Sender,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with the current time
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::next(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    /// Create a bot message
    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Sender::Bot, content)
    }
}

/// Change to a transcript, broadcast to renderers
///
/// Every `MessageAppended` doubles as the scroll-to-latest signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEvent {
    /// Transcript was cleared and re-seeded with a greeting
    Reset {
        /// Session epoch after the reset
        epoch: u64,
        /// Engine title for the new configuration
        title: String,
        /// Full transcript after the reset
        messages: Vec<Message>,
    },
    /// A message was appended
    MessageAppended {
        /// Session epoch the message belongs to
        epoch: u64,
        /// The appended message
        message: Message,
    },
    /// Transcript was discarded
    Closed {
        /// Session epoch after closing
        epoch: u64,
    },
    /// Session actor stopped; no further events follow
    Ended {
        /// Final session epoch
        epoch: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_increase() {
        let first = Message::user("a");
        let second = Message::bot("b");
        assert!(second.id > first.id);
    }

    #[test]
    fn test_message_id_serializes_as_number() {
        let message = Message::user("a");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["id"].to_string(), message.id.to_string());
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Sender::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
        assert_eq!(Sender::User.as_str(), "user");
    }

    #[test]
    fn test_content_kept_verbatim() {
        let message = Message::bot("line one\n• bullet");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"], "line one\n• bullet");
        assert_eq!(json["sender"], "bot");
    }

    #[test]
    fn test_event_tagging() {
        let event = TranscriptEvent::Closed { epoch: 3 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "closed");
        assert_eq!(json["epoch"], 3);
    }
}
