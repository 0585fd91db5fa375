//! Event decoding

use super::step::ReasoningStep;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of every frame that carries an event payload
pub const DATA_MARKER: &str = "data: ";

/// A typed event decoded from one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Reasoning {
        step: ReasoningStep,
    },
    ContentStart,
    ContentChar {
        #[serde(rename = "char")]
        ch: String,
        /// De-duplication key, optional on the wire
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    ContentEnd,
    /// Discriminator this client does not know; applied as a no-op
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    pub fn content_char(ch: impl Into<String>, id: Option<String>) -> Self {
        StreamEvent::ContentChar { ch: ch.into(), id }
    }

    pub fn reasoning(step: ReasoningStep) -> Self {
        StreamEvent::Reasoning { step }
    }

    /// Wire discriminator, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Reasoning { .. } => "reasoning",
            StreamEvent::ContentStart => "content_start",
            StreamEvent::ContentChar { .. } => "content_char",
            StreamEvent::ContentEnd => "content_end",
            StreamEvent::Unknown => "unknown",
        }
    }

    /// Encode as a frame line, without the trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if the event cannot be serialized.
    pub fn to_frame(&self) -> Result<String, ProtocolError> {
        let payload = serde_json::to_string(self).map_err(ProtocolError::Encode)?;
        Ok(format!("{DATA_MARKER}{payload}"))
    }
}

/// Why a frame produced no event without being an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Empty separator line
    Blank,
    /// SSE comment (`: ping`)
    Comment,
    /// Any other line without the data marker (`event:`, `id:`, `retry:` ...)
    OutOfBand,
}

/// Errors decoding or encoding frames
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed event payload: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Outcome of parsing a single frame
#[derive(Debug)]
pub enum ParsedFrame {
    Event(StreamEvent),
    Ignored(IgnoreReason),
    /// Payload failed to decode. The stream continues past it.
    Malformed(ProtocolError),
}

/// Decode one complete frame.
pub fn parse_frame(frame: &str) -> ParsedFrame {
    let line = frame.strip_suffix('\r').unwrap_or(frame);

    let Some(payload) = line.strip_prefix(DATA_MARKER) else {
        let reason = if line.trim().is_empty() {
            IgnoreReason::Blank
        } else if line.starts_with(':') {
            IgnoreReason::Comment
        } else {
            IgnoreReason::OutOfBand
        };
        return ParsedFrame::Ignored(reason);
    };

    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event) => ParsedFrame::Event(event),
        Err(e) => ParsedFrame::Malformed(ProtocolError::Malformed(e)),
    }
}
