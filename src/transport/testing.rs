//! Mock implementations for testing
//!
//! These mocks let the reader loop run without a socket.

use super::{ChunkSource, Connector, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug)]
enum Step {
    Chunk(Vec<u8>),
    Error(TransportError),
    /// Never yields again
    Stall,
}

/// Chunk source that replays a scripted sequence, then closes
#[derive(Debug, Default)]
pub struct MockChunkSource {
    steps: VecDeque<Step>,
}

impl MockChunkSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text chunk
    #[must_use]
    pub fn chunk(self, text: &str) -> Self {
        self.bytes(text.as_bytes())
    }

    /// Queue a raw byte chunk
    #[must_use]
    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.steps.push_back(Step::Chunk(bytes.to_vec()));
        self
    }

    /// Queue a read failure
    #[must_use]
    pub fn error(mut self, error: TransportError) -> Self {
        self.steps.push_back(Step::Error(error));
        self
    }

    /// Hang forever once reached, like a producer that stopped sending
    #[must_use]
    pub fn stall(mut self) -> Self {
        self.steps.push_back(Step::Stall);
        self
    }
}

#[async_trait]
impl ChunkSource for MockChunkSource {
    async fn next_chunk(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        match self.steps.pop_front()? {
            Step::Chunk(bytes) => Some(Ok(bytes)),
            Step::Error(e) => Some(Err(e)),
            Step::Stall => futures::future::pending().await,
        }
    }
}

/// Connector handing out a single prepared source
pub struct MockConnector {
    source: Mutex<Option<Result<MockChunkSource, TransportError>>>,
    opened: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(source: MockChunkSource) -> Self {
        Self {
            source: Mutex::new(Some(Ok(source))),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Every `open` fails with `error`
    pub fn failing(error: TransportError) -> Self {
        Self {
            source: Mutex::new(Some(Err(error))),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Messages passed to `open`, in order
    pub fn opened_messages(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Source = MockChunkSource;

    async fn open(&self, message: &str) -> Result<MockChunkSource, TransportError> {
        self.opened.lock().unwrap().push(message.to_string());
        let mut slot = self.source.lock().unwrap();
        match slot.take() {
            Some(Ok(source)) => Ok(source),
            Some(Err(e)) => {
                *slot = Some(Err(e.clone()));
                Err(e)
            }
            None => Err(TransportError::connect("mock source already used")),
        }
    }
}
