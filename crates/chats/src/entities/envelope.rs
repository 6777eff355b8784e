//! Wire envelopes exchanged over a room channel.
//!
//! Every frame is a JSON object `{ "type": ..., "content": ... }`. Outbound
//! frames carry the message text; inbound `message` frames carry a full
//! [`ChatMessage`]. Inbound frames of any other type are ignored.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

pub const MESSAGE_KIND: &str = "message";

/// Client to server frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEnvelope<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: &'a str,
}

impl<'a> OutboundEnvelope<'a> {
    pub fn message(content: &'a str) -> Self {
        Self {
            kind: MESSAGE_KIND,
            content,
        }
    }

    pub fn to_frame(&self) -> String {
        // Serializing a struct of two strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct RawInboundEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: serde_json::Value,
}

/// A decoded server to client frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Message(ChatMessage),
    /// A well-formed frame of a kind this client does not act on
    Ignored { kind: String },
}

impl InboundFrame {
    /// Decode a text frame; the error string describes why it is malformed.
    pub fn parse(text: &str) -> Result<Self, String> {
        let raw: RawInboundEnvelope =
            serde_json::from_str(text).map_err(|error| format!("invalid envelope: {error}"))?;

        if raw.kind != MESSAGE_KIND {
            return Ok(Self::Ignored { kind: raw.kind });
        }

        let message = serde_json::from_value(raw.content)
            .map_err(|error| format!("invalid message content: {error}"))?;
        Ok(Self::Message(message))
    }
}
