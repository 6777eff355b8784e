use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChatError, ChatResult};

/// Longest message body accepted from the local user, in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Server-assigned message identifier, unique within a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Class-scoped chat room identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents a message delivered over a room channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identifier assigned by the server
    pub id: MessageId,
    /// Who wrote the message
    pub user: MessageAuthor,
    /// Message body
    pub content: String,
    /// Creation timestamp as sent by the server
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAuthor {
    pub id: i64,
    pub full_name: String,
}

impl ChatMessage {
    /// Whether the message was written by the given user
    pub fn is_from(&self, user_id: i64) -> bool {
        self.user.id == user_id
    }

    /// Parse `created_at` as RFC 3339, if the server used that format
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|timestamp| timestamp.with_timezone(&Utc))
    }
}

/// Validated text ready to hand to a chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage(String);

impl OutgoingMessage {
    /// Trim the input and check it is non-empty and within [`MAX_MESSAGE_CHARS`].
    pub fn new(text: &str) -> ChatResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::validation("Message content cannot be empty"));
        }

        if trimmed.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::validation(format!(
                "Message content too long (max {MAX_MESSAGE_CHARS} characters)"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
