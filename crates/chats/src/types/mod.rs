//! Shared types for the chat client.

pub mod errors;
pub mod events;

pub use errors::{ChatError, ChatResult};
pub use events::{ChannelState, ChatEvent, ChatFault, FaultKind};
