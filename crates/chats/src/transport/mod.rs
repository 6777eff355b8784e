//! Channel transports a [`ChatSession`](crate::ChatSession) runs over.

mod endpoint;
mod memory;
mod websocket;

use url::Url;

use crate::types::ChatResult;

pub use crate::session::EventSink;
pub use endpoint::ChatEndpoint;
pub use memory::{MemoryTransport, OpenedChannel};
pub use websocket::WebSocketTransport;

/// What a transport reports about the channel it opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    Frame(String),
    Closed,
    Failed(String),
}

/// The sending half of an opened channel, owned by the session
pub trait Channel: Send {
    /// Queue a text frame. Must not block.
    fn send_text(&mut self, frame: String) -> ChatResult<()>;

    /// Close the channel, or abandon the handshake if it is still running.
    fn close(&mut self);
}

/// Opens channels to chat rooms.
///
/// `open` returns immediately; progress is reported through `events`, which
/// may be called from any thread, including synchronously inside `open`.
pub trait ChatTransport: Send + Sync {
    fn open(&self, target: &Url, events: EventSink) -> Box<dyn Channel>;
}

impl<T: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<T> {
    fn open(&self, target: &Url, events: EventSink) -> Box<dyn Channel> {
        (**self).open(target, events)
    }
}
