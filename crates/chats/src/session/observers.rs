//! Observer registries and the handles returned when registering.

use std::sync::{Arc, Mutex, Weak};

use super::{lock, SessionInner};
use crate::entities::ChatMessage;
use crate::types::ChatFault;

pub(crate) type ConnectObserver = Arc<dyn Fn() + Send + Sync>;
pub(crate) type MessageObserver = Arc<dyn Fn(&ChatMessage) + Send + Sync>;
pub(crate) type FaultObserver = Arc<dyn Fn(&ChatFault) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverKind {
    Connect,
    Message,
    Error,
}

/// Registered observers, each list kept in registration order
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    connect: Vec<(u64, ConnectObserver)>,
    message: Vec<(u64, MessageObserver)>,
    fault: Vec<(u64, FaultObserver)>,
}

impl Observers {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn add_connect(&mut self, observer: ConnectObserver) -> u64 {
        let id = self.allocate();
        self.connect.push((id, observer));
        id
    }

    pub(crate) fn add_message(&mut self, observer: MessageObserver) -> u64 {
        let id = self.allocate();
        self.message.push((id, observer));
        id
    }

    pub(crate) fn add_fault(&mut self, observer: FaultObserver) -> u64 {
        let id = self.allocate();
        self.fault.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, kind: ObserverKind, id: u64) -> bool {
        fn remove_from<T>(list: &mut Vec<(u64, T)>, id: u64) -> bool {
            let before = list.len();
            list.retain(|(existing, _)| *existing != id);
            list.len() != before
        }

        match kind {
            ObserverKind::Connect => remove_from(&mut self.connect, id),
            ObserverKind::Message => remove_from(&mut self.message, id),
            ObserverKind::Error => remove_from(&mut self.fault, id),
        }
    }

    pub(crate) fn count(&self, kind: ObserverKind) -> usize {
        match kind {
            ObserverKind::Connect => self.connect.len(),
            ObserverKind::Message => self.message.len(),
            ObserverKind::Error => self.fault.len(),
        }
    }

    pub(crate) fn connect_snapshot(&self) -> Vec<ConnectObserver> {
        self.connect.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    pub(crate) fn message_snapshot(&self) -> Vec<MessageObserver> {
        self.message.iter().map(|(_, o)| Arc::clone(o)).collect()
    }

    pub(crate) fn fault_snapshot(&self) -> Vec<FaultObserver> {
        self.fault.iter().map(|(_, o)| Arc::clone(o)).collect()
    }
}

/// Handle to one registered observer.
///
/// Dropping the handle leaves the observer registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    inner: Weak<Mutex<SessionInner>>,
    kind: ObserverKind,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(inner: Weak<Mutex<SessionInner>>, kind: ObserverKind, id: u64) -> Self {
        Self { inner, kind, id }
    }

    pub fn kind(&self) -> ObserverKind {
        self.kind
    }

    /// Remove the observer. Returns `false` if the session is gone or the
    /// observer was already removed.
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = lock(&inner).observers.remove(self.kind, self.id);
        removed
    }
}
