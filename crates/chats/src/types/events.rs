//! Connection state and the events a chat session reports.

use crate::entities::{ChatMessage, RoomId};

/// Lifecycle of the single channel a session owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
    Errored,
}

impl ChannelState {
    /// Whether a channel attempt is in flight or established
    pub fn is_active(&self) -> bool {
        matches!(self, ChannelState::Connecting | ChannelState::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelState::Idle => "idle",
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Closed => "closed",
            ChannelState::Errored => "errored",
        }
    }
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The channel broke; the session is now `Errored`.
    Transport,
    /// A frame could not be decoded; the channel stays up.
    MalformedFrame,
}

/// A problem reported to error observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFault {
    pub kind: FaultKind,
    pub detail: String,
}

impl ChatFault {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Transport,
            detail: detail.into(),
        }
    }

    pub fn malformed_frame(detail: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::MalformedFrame,
            detail: detail.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.kind, FaultKind::Transport)
    }
}

impl std::fmt::Display for ChatFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FaultKind::Transport => write!(f, "connection error: {}", self.detail),
            FaultKind::MalformedFrame => write!(f, "malformed frame: {}", self.detail),
        }
    }
}

/// Events published on a session's broadcast stream
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Connected { room: RoomId },
    Message(ChatMessage),
    Fault(ChatFault),
    Disconnected { room: RoomId },
}

impl ChatEvent {
    /// Get event type name for logging
    pub fn event_type_name(&self) -> &'static str {
        match self {
            ChatEvent::Connected { .. } => "connected",
            ChatEvent::Message(_) => "message",
            ChatEvent::Fault(_) => "fault",
            ChatEvent::Disconnected { .. } => "disconnected",
        }
    }
}
