//! In-process transport that records traffic instead of touching the network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use url::Url;

use super::{Channel, ChatTransport, EventSink, TransportEvent};
use crate::session::lock;
use crate::types::{ChatError, ChatResult};

/// One channel opened through a [`MemoryTransport`]
#[derive(Debug, Clone)]
pub struct OpenedChannel {
    pub target: Url,
    pub events: EventSink,
    frames: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl OpenedChannel {
    pub fn deliver(&self, event: TransportEvent) {
        self.events.deliver(event);
    }

    pub fn frames(&self) -> Vec<String> {
        lock(&self.frames).clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Transport whose channels are driven by hand.
///
/// Every `open` is recorded; tests feed events through the returned
/// [`OpenedChannel`] and inspect the frames the session sent.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    opened: Arc<Mutex<Vec<OpenedChannel>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<OpenedChannel> {
        lock(&self.opened).clone()
    }

    pub fn open_count(&self) -> usize {
        lock(&self.opened).len()
    }

    pub fn channel(&self, index: usize) -> Option<OpenedChannel> {
        lock(&self.opened).get(index).cloned()
    }

    pub fn last(&self) -> Option<OpenedChannel> {
        lock(&self.opened).last().cloned()
    }
}

impl ChatTransport for MemoryTransport {
    fn open(&self, target: &Url, events: EventSink) -> Box<dyn Channel> {
        let opened = OpenedChannel {
            target: target.clone(),
            events,
            frames: Arc::new(Mutex::new(Vec::new())),
            closed: Arc::new(AtomicBool::new(false)),
        };
        let channel = MemoryChannel {
            frames: Arc::clone(&opened.frames),
            closed: Arc::clone(&opened.closed),
        };
        lock(&self.opened).push(opened);
        Box::new(channel)
    }
}

struct MemoryChannel {
    frames: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl Channel for MemoryChannel {
    fn send_text(&mut self, frame: String) -> ChatResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChatError::ChannelClosed);
        }
        lock(&self.frames).push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
