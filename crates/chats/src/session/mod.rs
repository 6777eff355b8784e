//! The chat session: one room channel, its transcript and its observers.
//!
//! All state lives behind a single mutex. Transport events are applied while
//! the lock is held and observers are invoked after it is released, in
//! registration order. Every connect and disconnect advances a generation
//! counter; events tagged with an older generation are discarded, so a
//! superseded or abandoned channel can never touch the session again.
//! Events reported while `open` is still running are queued and replayed
//! once the channel is attached, so an open session can always send.

mod observers;
mod transcript;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::entities::{ChatMessage, InboundFrame, OutboundEnvelope, RoomId};
use crate::transport::{Channel, ChatEndpoint, ChatTransport, TransportEvent};
use crate::types::{ChannelState, ChatEvent, ChatFault};

use observers::{ConnectObserver, FaultObserver, MessageObserver, Observers};
pub use observers::{ObserverKind, Subscription};
pub use transcript::Transcript;

const EVENT_CAPACITY: usize = 100;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct SessionInner {
    state: ChannelState,
    generation: u64,
    room: Option<RoomId>,
    channel: Option<Box<dyn Channel>>,
    /// Events held back until the current attempt's channel is attached
    pending: Option<VecDeque<TransportEvent>>,
    transcript: Transcript,
    observers: Observers,
}

impl std::fmt::Debug for SessionInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionInner")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("room", &self.room)
            .field("transcript_len", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

/// Work left to do once the session lock has been released
enum Dispatch {
    Nothing,
    Connected {
        room: RoomId,
        observers: Vec<ConnectObserver>,
    },
    Message {
        message: ChatMessage,
        observers: Vec<MessageObserver>,
    },
    Fault {
        fault: ChatFault,
        observers: Vec<FaultObserver>,
    },
    Disconnected {
        room: RoomId,
    },
}

impl Dispatch {
    fn run(self, events: &broadcast::Sender<ChatEvent>) {
        // A send error only means nobody is subscribed.
        match self {
            Dispatch::Nothing => {}
            Dispatch::Connected { room, observers } => {
                for observer in observers {
                    observer();
                }
                let _ = events.send(ChatEvent::Connected { room });
            }
            Dispatch::Message { message, observers } => {
                for observer in observers {
                    observer(&message);
                }
                let _ = events.send(ChatEvent::Message(message));
            }
            Dispatch::Fault { fault, observers } => {
                for observer in observers {
                    observer(&fault);
                }
                let _ = events.send(ChatEvent::Fault(fault));
            }
            Dispatch::Disconnected { room } => {
                let _ = events.send(ChatEvent::Disconnected { room });
            }
        }
    }
}

impl SessionInner {
    fn new() -> Self {
        Self {
            state: ChannelState::Idle,
            generation: 0,
            room: None,
            channel: None,
            pending: None,
            transcript: Transcript::new(),
            observers: Observers::default(),
        }
    }

    fn apply(&mut self, event: TransportEvent, room: RoomId) -> Dispatch {
        match event {
            TransportEvent::Opened => {
                if self.state != ChannelState::Connecting {
                    return Dispatch::Nothing;
                }
                self.state = ChannelState::Open;
                info!(room = %room, "chat channel open");
                Dispatch::Connected {
                    room,
                    observers: self.observers.connect_snapshot(),
                }
            }
            TransportEvent::Frame(text) => self.apply_frame(&text, room),
            TransportEvent::Closed => {
                if !self.state.is_active() {
                    return Dispatch::Nothing;
                }
                self.state = ChannelState::Closed;
                self.channel = None;
                info!(room = %room, "chat channel closed by server");
                Dispatch::Disconnected { room }
            }
            TransportEvent::Failed(detail) => {
                if !self.state.is_active() {
                    return Dispatch::Nothing;
                }
                self.state = ChannelState::Errored;
                self.channel = None;
                warn!(room = %room, error = %detail, "chat channel failed");
                Dispatch::Fault {
                    fault: ChatFault::transport(detail),
                    observers: self.observers.fault_snapshot(),
                }
            }
        }
    }

    fn apply_frame(&mut self, text: &str, room: RoomId) -> Dispatch {
        if self.state != ChannelState::Open {
            debug!(state = %self.state, "dropping frame received while channel not open");
            return Dispatch::Nothing;
        }

        match InboundFrame::parse(text) {
            Ok(InboundFrame::Message(message)) => {
                if !self.transcript.push(message.clone()) {
                    trace!(id = %message.id, "duplicate message suppressed");
                    return Dispatch::Nothing;
                }
                debug!(room = %room, id = %message.id, "message received");
                Dispatch::Message {
                    message,
                    observers: self.observers.message_snapshot(),
                }
            }
            Ok(InboundFrame::Ignored { kind }) => {
                debug!(kind = %kind, "ignoring frame");
                Dispatch::Nothing
            }
            Err(detail) => {
                warn!(room = %room, error = %detail, "malformed frame");
                Dispatch::Fault {
                    fault: ChatFault::malformed_frame(detail),
                    observers: self.observers.fault_snapshot(),
                }
            }
        }
    }
}

/// Delivery point a transport uses to report channel events.
///
/// Each sink is bound to one connection attempt. Once the session has moved
/// on to another attempt, or been dropped, deliveries are ignored.
#[derive(Debug, Clone)]
pub struct EventSink {
    inner: Weak<Mutex<SessionInner>>,
    generation: u64,
    room: RoomId,
    events: broadcast::Sender<ChatEvent>,
}

impl EventSink {
    pub fn room(&self) -> RoomId {
        self.room
    }

    /// Whether this sink still belongs to the session's current attempt
    pub fn is_current(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| lock(&inner).generation == self.generation)
    }

    pub fn deliver(&self, event: TransportEvent) {
        let Some(inner) = self.inner.upgrade() else {
            trace!("session dropped, discarding transport event");
            return;
        };

        let dispatch = {
            let mut guard = lock(&inner);
            if guard.generation != self.generation {
                trace!(
                    stale = self.generation,
                    current = guard.generation,
                    "discarding event from superseded channel"
                );
                return;
            }
            if let Some(pending) = guard.pending.as_mut() {
                trace!("channel not attached yet, queueing transport event");
                pending.push_back(event);
                return;
            }
            guard.apply(event, self.room)
        };

        dispatch.run(&self.events);
    }
}

/// A client session bound to at most one chat room at a time
pub struct ChatSession<T: ChatTransport> {
    transport: T,
    endpoint: ChatEndpoint,
    inner: Arc<Mutex<SessionInner>>,
    events: broadcast::Sender<ChatEvent>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T, endpoint: ChatEndpoint) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport,
            endpoint,
            inner: Arc::new(Mutex::new(SessionInner::new())),
            events,
        }
    }

    pub fn endpoint(&self) -> &ChatEndpoint {
        &self.endpoint
    }

    /// Open a channel to `room`, replacing any existing one.
    ///
    /// The transcript is cleared and the session moves to `Connecting`.
    /// Connect observers fire once the transport reports the channel open.
    pub fn connect(&self, room: RoomId, token: &str) {
        let target = self.endpoint.room_target(room, token);

        let (generation, previous, previous_room) = {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            let previous = inner.channel.take();
            let previous_room = inner.room.filter(|_| inner.state.is_active());
            inner.state = ChannelState::Connecting;
            inner.room = Some(room);
            inner.pending = Some(VecDeque::new());
            inner.transcript.clear();
            (inner.generation, previous, previous_room)
        };

        if let Some(mut previous) = previous {
            previous.close();
        }
        if let Some(previous_room) = previous_room {
            debug!(room = %previous_room, "replaced existing channel");
            let _ = self
                .events
                .send(ChatEvent::Disconnected { room: previous_room });
        }

        info!(room = %room, "connecting to chat room");
        let sink = EventSink {
            inner: Arc::downgrade(&self.inner),
            generation,
            room,
            events: self.events.clone(),
        };
        let mut channel = self.transport.open(&target, sink);

        {
            let mut inner = lock(&self.inner);
            if inner.generation != generation {
                drop(inner);
                debug!(room = %room, "attempt superseded before the channel was stored");
                channel.close();
                return;
            }
            inner.channel = Some(channel);
        }
        self.replay_pending(generation, room);
    }

    /// Apply events queued during `open` one at a time, in arrival order.
    ///
    /// Deliveries arriving meanwhile keep queueing behind the replay, so
    /// observers never see them out of order.
    fn replay_pending(&self, generation: u64, room: RoomId) {
        loop {
            let dispatch = {
                let mut inner = lock(&self.inner);
                if inner.generation != generation {
                    return;
                }
                let next = inner.pending.as_mut().and_then(VecDeque::pop_front);
                match next {
                    Some(event) => inner.apply(event, room),
                    None => {
                        inner.pending = None;
                        return;
                    }
                }
            };
            dispatch.run(&self.events);
        }
    }

    /// Send `text` to the current room.
    ///
    /// Returns `false` without sending anything unless the channel is open.
    pub fn send(&self, text: &str) -> bool {
        let mut inner = lock(&self.inner);
        if inner.state != ChannelState::Open {
            debug!(state = %inner.state, "send ignored, channel not open");
            return false;
        }

        let frame = OutboundEnvelope::message(text).to_frame();
        let Some(channel) = inner.channel.as_mut() else {
            debug!("send ignored, no channel attached");
            return false;
        };

        match channel.send_text(frame) {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "failed to queue outbound frame");
                false
            }
        }
    }

    /// Close the channel. Calling this while nothing is active does nothing.
    pub fn disconnect(&self) {
        let (channel, room) = {
            let mut inner = lock(&self.inner);
            if !inner.state.is_active() {
                return;
            }
            inner.generation += 1;
            inner.state = ChannelState::Closed;
            inner.pending = None;
            (inner.channel.take(), inner.room)
        };

        if let Some(mut channel) = channel {
            channel.close();
        }
        if let Some(room) = room {
            info!(room = %room, "disconnected from chat room");
            let _ = self.events.send(ChatEvent::Disconnected { room });
        }
    }

    pub fn on_connect<F>(&self, observer: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = lock(&self.inner).observers.add_connect(Arc::new(observer));
        self.subscription(ObserverKind::Connect, id)
    }

    pub fn on_message<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&ChatMessage) + Send + Sync + 'static,
    {
        let id = lock(&self.inner).observers.add_message(Arc::new(observer));
        self.subscription(ObserverKind::Message, id)
    }

    pub fn on_error<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&ChatFault) + Send + Sync + 'static,
    {
        let id = lock(&self.inner).observers.add_fault(Arc::new(observer));
        self.subscription(ObserverKind::Error, id)
    }

    fn subscription(&self, kind: ObserverKind, id: u64) -> Subscription {
        Subscription::new(Arc::downgrade(&self.inner), kind, id)
    }

    /// Stream of every session event, for consumers living in async code
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn observer_count(&self, kind: ObserverKind) -> usize {
        lock(&self.inner).observers.count(kind)
    }

    pub fn state(&self) -> ChannelState {
        lock(&self.inner).state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ChannelState::Open
    }

    pub fn room(&self) -> Option<RoomId> {
        lock(&self.inner).room
    }

    /// Snapshot of the current room's messages in arrival order
    pub fn transcript(&self) -> Vec<ChatMessage> {
        lock(&self.inner).transcript.messages().to_vec()
    }

    pub fn transcript_len(&self) -> usize {
        lock(&self.inner).transcript.len()
    }
}

impl<T: ChatTransport> Drop for ChatSession<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
