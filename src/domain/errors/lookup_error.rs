//! Link lookup error types.

use thiserror::Error;

/// Errors raised while querying the link lookup service.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LookupError {
    #[error("network error during lookup: {message}")]
    Network { message: String },

    #[error("lookup request timed out")]
    Timeout,

    #[error("lookup service returned status {status}")]
    Status { status: u16 },

    #[error("failed to decode lookup response: {message}")]
    Decode { message: String },
}

impl LookupError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether the service was never reached or never answered.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout)
    }
}
