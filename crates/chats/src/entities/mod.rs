//! Chat domain entities and wire envelopes.

pub mod envelope;
pub mod message;

pub use envelope::{InboundFrame, OutboundEnvelope, MESSAGE_KIND};
pub use message::{
    ChatMessage, MessageAuthor, MessageId, OutgoingMessage, RoomId, MAX_MESSAGE_CHARS,
};
