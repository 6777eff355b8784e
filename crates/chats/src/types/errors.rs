//! Error types for the chat client.

use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Main error type for the chat client
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid chat endpoint: {message}")]
    InvalidEndpoint { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Channel closed")]
    ChannelClosed,
}

impl ChatError {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<url::ParseError> for ChatError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            message: err.to_string(),
        }
    }
}
