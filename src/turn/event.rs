//! Inputs to the turn state machine

use crate::protocol::StreamEvent;

/// Events that drive a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// A decoded protocol event
    Stream(StreamEvent),
    /// The connection ended normally
    StreamClosed,
    /// The connection failed, or surrounding policy gave up on it
    TransportFailed { message: String },
}

impl From<StreamEvent> for TurnEvent {
    fn from(event: StreamEvent) -> Self {
        TurnEvent::Stream(event)
    }
}
