//! HTTP transport over `reqwest`

use super::{ChunkSource, Connector, TransportError};
use crate::config::ClientConfig;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

/// Client for the producer's chat endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns a `Connect` error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::connect(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the producer
    ///
    /// # Errors
    ///
    /// Returns an error if the producer is unreachable, answers with a
    /// non-success status, or sends a body that is not a health report.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::status(status, &body));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Connector for HttpTransport {
    type Source = HttpChunkSource;

    /// POST the message; the response body is the event stream.
    async fn open(&self, message: &str) -> Result<HttpChunkSource, TransportError> {
        let url = format!("{}/agent/chat", self.base_url);
        tracing::debug!(%url, "Opening chat stream");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&json!({ "message": message }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::status(status, &body));
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(TransportError::from))
            .boxed();
        Ok(HttpChunkSource { stream })
    }
}

/// Response body of an open chat request
pub struct HttpChunkSource {
    stream: BoxStream<'static, Result<Vec<u8>, TransportError>>,
}

#[async_trait]
impl ChunkSource for HttpChunkSource {
    async fn next_chunk(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        self.stream.next().await
    }
}
