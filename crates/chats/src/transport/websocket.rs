//! WebSocket transport on top of tokio-tungstenite.
//!
//! Each channel is one spawned task that owns the socket. The session talks
//! to it through an unbounded queue of outbound frames; dropping the queue's
//! sender closes the socket, or abandons the handshake if it has not
//! completed yet.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};
use url::Url;

use super::{Channel, ChatEndpoint, ChatTransport, EventSink, TransportEvent};
use crate::types::{ChatError, ChatResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

impl ChatTransport for WebSocketTransport {
    fn open(&self, target: &Url, events: EventSink) -> Box<dyn Channel> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(run_channel(target.clone(), outbound_rx, events));
            }
            Err(error) => {
                events.deliver(TransportEvent::Failed(format!(
                    "no async runtime available: {error}"
                )));
            }
        }

        Box::new(WebSocketChannel {
            outbound: Some(outbound_tx),
        })
    }
}

struct WebSocketChannel {
    outbound: Option<mpsc::UnboundedSender<String>>,
}

impl Channel for WebSocketChannel {
    fn send_text(&mut self, frame: String) -> ChatResult<()> {
        let sender = self.outbound.as_ref().ok_or(ChatError::ChannelClosed)?;
        sender.send(frame).map_err(|_| ChatError::ChannelClosed)
    }

    fn close(&mut self) {
        self.outbound.take();
    }
}

async fn run_channel(
    target: Url,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: EventSink,
) {
    let shown = ChatEndpoint::redacted(&target);
    debug!(target = %shown, "opening websocket");

    let handshake = tokio::select! {
        result = connect_async(target.as_str()) => result,
        None = outbound.recv() => {
            debug!(target = %shown, "handshake abandoned");
            return;
        }
    };

    let stream = match handshake {
        Ok((stream, _response)) => stream,
        Err(error) => {
            warn!(target = %shown, error = %error, "websocket handshake failed");
            events.deliver(TransportEvent::Failed(error.to_string()));
            return;
        }
    };

    events.deliver(TransportEvent::Opened);
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if let Err(error) = write.send(Message::Text(text)).await {
                        warn!(target = %shown, error = %error, "websocket send failed");
                        events.deliver(TransportEvent::Failed(error.to_string()));
                        return;
                    }
                }
                None => {
                    let _ = write.close().await;
                    debug!(target = %shown, "websocket closed locally");
                    events.deliver(TransportEvent::Closed);
                    return;
                }
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => events.deliver(TransportEvent::Frame(text)),
                Some(Ok(Message::Close(frame))) => {
                    debug!(target = %shown, ?frame, "websocket closed by server");
                    events.deliver(TransportEvent::Closed);
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(target = %shown, error = %error, "websocket read failed");
                    events.deliver(TransportEvent::Failed(error.to_string()));
                    return;
                }
                None => {
                    events.deliver(TransportEvent::Closed);
                    return;
                }
            },
        }
    }
}
