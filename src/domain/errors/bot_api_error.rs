//! Chat platform API error types.

use thiserror::Error;

/// Errors raised by calls into the chat platform.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BotApiError {
    #[error("not connected to the chat platform")]
    NotConnected,

    #[error("action {action} failed with retcode {retcode}: {message}")]
    ActionFailed {
        action: String,
        retcode: i64,
        message: String,
    },

    #[error("timeout waiting for {action} response")]
    Timeout { action: String },

    #[error("unexpected {action} response: {message}")]
    UnexpectedResponse { action: String, message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("connection closed before {action} completed")]
    Closed { action: String },
}

impl BotApiError {
    /// Creates action failed error.
    #[must_use]
    pub fn action_failed(action: impl Into<String>, retcode: i64, message: impl Into<String>) -> Self {
        Self::ActionFailed {
            action: action.into(),
            retcode,
            message: message.into(),
        }
    }

    /// Creates unexpected response error.
    #[must_use]
    pub fn unexpected(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Creates serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
