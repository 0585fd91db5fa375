//! Transport: pulling chunks off the connection and driving a turn with them

mod driver;
mod error;
mod http;

#[cfg(test)]
pub mod testing;

pub use driver::{run_turn, DriveOutcome, TurnDriver};
pub use error::{TransportError, TransportErrorKind};
pub use http::{HealthStatus, HttpChunkSource, HttpTransport};

use async_trait::async_trait;
use std::sync::Arc;

/// A source of raw response body chunks.
///
/// `None` means the connection closed normally. After an error or `None` the
/// source is not polled again.
#[async_trait]
pub trait ChunkSource: Send {
    async fn next_chunk(&mut self) -> Option<Result<Vec<u8>, TransportError>>;
}

/// Opens the response stream for one submitted message
#[async_trait]
pub trait Connector: Send + Sync {
    type Source: ChunkSource + 'static;

    /// # Errors
    ///
    /// Returns a [`TransportError`] if the stream cannot be opened, including
    /// when the producer rejects the request.
    async fn open(&self, message: &str) -> Result<Self::Source, TransportError>;
}

#[async_trait]
impl<T: ChunkSource + ?Sized> ChunkSource for Box<T> {
    async fn next_chunk(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        (**self).next_chunk().await
    }
}

#[async_trait]
impl<T: Connector + ?Sized> Connector for Arc<T> {
    type Source = T::Source;

    async fn open(&self, message: &str) -> Result<Self::Source, TransportError> {
        (**self).open(message).await
    }
}
