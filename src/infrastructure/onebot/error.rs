use thiserror::Error;

use crate::domain::errors::BotApiError;

pub type OneBotResult<T> = Result<T, OneBotError>;

#[derive(Debug, Error)]
pub enum OneBotError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("connection closed with code {code}: {reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("websocket error: {message}")]
    WebSocket { message: String },

    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("invalid endpoint: {message}")]
    InvalidEndpoint { message: String },

    #[error("reconnection limit exceeded after {attempts} attempts")]
    ReconnectionLimitExceeded { attempts: u32 },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("protocol error: {message}")]
    ProtocolError { message: String },

    #[error("timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("not connected to OneBot endpoint")]
    NotConnected,

    #[error("already connecting or connected")]
    AlreadyConnected,
}

impl OneBotError {
    #[must_use]
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn websocket(message: impl Into<String>) -> Self {
        Self::WebSocket {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Whether the client loop should dial again after this error.
    #[must_use]
    pub const fn should_reconnect(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::ConnectionClosed { .. }
                | Self::WebSocket { .. }
                | Self::Timeout { .. }
        )
    }

    /// Errors that retrying cannot fix.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. }
                | Self::InvalidEndpoint { .. }
                | Self::ReconnectionLimitExceeded { .. }
        )
    }
}

impl From<OneBotError> for BotApiError {
    fn from(error: OneBotError) -> Self {
        match error {
            OneBotError::SerializationError { message } => Self::serialization(message),
            _ => Self::NotConnected,
        }
    }
}
