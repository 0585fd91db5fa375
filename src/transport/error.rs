//! Transport error types

use std::time::Duration;
use thiserror::Error;

/// Transport failure with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn status(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("producer returned {status}")
        } else {
            format!("producer returned {status}: {body}")
        };
        Self::new(TransportErrorKind::Status(status), message)
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Read, message)
    }

    pub fn stalled(after: Duration) -> Self {
        Self::new(
            TransportErrorKind::Stalled,
            format!("no data received for {after:?}"),
        )
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Could not reach the producer
    Connect,
    /// Producer answered with a non-success status
    Status(u16),
    /// Connection dropped or a read failed mid-stream
    Read,
    /// Stall timeout elapsed without a chunk
    Stalled,
}

impl TransportErrorKind {
    /// Whether any part of the response body may already have been received
    pub fn is_mid_stream(self) -> bool {
        matches!(self, Self::Read | Self::Stalled)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::connect(e.to_string())
        } else if let Some(status) = e.status() {
            TransportError::status(status.as_u16(), "")
        } else {
            TransportError::read(e.to_string())
        }
    }
}
