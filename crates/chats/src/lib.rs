//! # Campus Chats Crate
//!
//! Client side of the class chat: a [`ChatSession`] keeps one live channel
//! to a room, collects the room's messages without duplicates and notifies
//! registered observers as the channel opens, messages arrive and faults
//! occur.
//!
//! ## Architecture
//!
//! - **Entities**: Messages, identifiers and wire envelopes
//! - **Session**: Channel lifecycle, transcript and observers
//! - **Transport**: WebSocket and in-memory channel implementations
//! - **Types**: Errors, states and events
//!
//! ## Usage
//!
//! ```no_run
//! use campus_chats::{ChatEndpoint, ChatSession, RoomId, WebSocketTransport};
//!
//! # fn run() -> campus_chats::ChatResult<()> {
//! let endpoint = ChatEndpoint::parse("ws://127.0.0.1:8080/api/ws/chat")?;
//! let session = ChatSession::new(WebSocketTransport::new(), endpoint);
//! let _sub = session.on_message(|message| println!("{}", message.content));
//! session.connect(RoomId(12), "access-token");
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod session;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use entities::{
    ChatMessage, InboundFrame, MessageAuthor, MessageId, OutboundEnvelope, OutgoingMessage,
    RoomId, MAX_MESSAGE_CHARS,
};
pub use session::{ChatSession, EventSink, ObserverKind, Subscription, Transcript};
pub use transport::{
    Channel, ChatEndpoint, ChatTransport, MemoryTransport, OpenedChannel, TransportEvent,
    WebSocketTransport,
};
pub use types::{ChannelState, ChatError, ChatEvent, ChatFault, ChatResult, FaultKind};
