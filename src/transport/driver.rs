//! Reader loop for one turn
//!
//! One loop per turn: await the next chunk, then run it through
//! assembler -> parser -> state machine to completion before awaiting again.
//! The only suspension point is the chunk read.

use super::{ChunkSource, Connector, TransportError};
use crate::conversation::TurnTicket;
use crate::protocol::{parse_frame, FrameAssembler, ParsedFrame};
use crate::turn::{transition, Effect, Turn, TurnEvent, TurnSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// How a reader loop ended
#[derive(Debug)]
pub enum DriveOutcome {
    /// The stream ended or failed; the turn is sealed
    Sealed(Turn),
    /// The consumer gave up on the turn; nothing further was applied
    Abandoned { turn_id: Uuid },
}

impl DriveOutcome {
    pub fn turn_id(&self) -> Uuid {
        match self {
            DriveOutcome::Sealed(turn) => turn.id(),
            DriveOutcome::Abandoned { turn_id } => *turn_id,
        }
    }
}

/// Owns the in-flight turn and applies chunks to it
pub struct TurnDriver {
    turn: Turn,
    assembler: FrameAssembler,
    publisher: watch::Sender<Arc<TurnSnapshot>>,
    cancel: CancellationToken,
    stall_timeout: Option<Duration>,
}

impl TurnDriver {
    pub fn new(ticket: TurnTicket) -> Self {
        let (turn, publisher, cancel) = ticket.into_parts();
        Self {
            turn,
            assembler: FrameAssembler::new(),
            publisher,
            cancel,
            stall_timeout: None,
        }
    }

    /// Force-seal the turn if no chunk arrives within `timeout`. There is no
    /// limit by default; a stalled producer leaves the turn streaming.
    #[must_use]
    pub fn with_stall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    /// Feed one chunk synchronously. Returns how many events were decoded.
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        let mut decoded = 0;
        for frame in self.assembler.push(chunk) {
            match parse_frame(&frame) {
                ParsedFrame::Event(event) => {
                    decoded += 1;
                    self.apply(event.into());
                }
                ParsedFrame::Ignored(reason) => {
                    tracing::trace!(turn_id = %self.turn.id(), ?reason, "Frame ignored");
                }
                ParsedFrame::Malformed(e) => {
                    tracing::warn!(
                        turn_id = %self.turn.id(),
                        error = %e,
                        frame_len = frame.len(),
                        "Skipping undecodable frame"
                    );
                }
            }
        }
        decoded
    }

    /// Pull chunks until the stream ends, fails, or the turn is abandoned.
    pub async fn run<S: ChunkSource>(mut self, mut source: S) -> DriveOutcome {
        let cancel = self.cancel.clone();
        let stall_timeout = self.stall_timeout;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return self.abandon(),
                next = next_chunk(&mut source, stall_timeout) => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    self.feed(&chunk);
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        turn_id = %self.turn.id(),
                        kind = ?e.kind,
                        mid_stream = e.kind.is_mid_stream(),
                        error = %e,
                        "Transport failed"
                    );
                    return self.seal(TurnEvent::TransportFailed { message: e.message });
                }
                None => {
                    let dropped = self.assembler.finish();
                    if dropped > 0 {
                        tracing::debug!(
                            turn_id = %self.turn.id(),
                            bytes = dropped,
                            "Discarding unterminated trailing fragment"
                        );
                    }
                    return self.seal(TurnEvent::StreamClosed);
                }
            }
        }
    }

    /// The stream could not be opened at all
    pub fn fail(self, error: TransportError) -> DriveOutcome {
        tracing::warn!(
            turn_id = %self.turn.id(),
            kind = ?error.kind,
            error = %error,
            "Could not open response stream"
        );
        self.seal(TurnEvent::TransportFailed {
            message: error.message,
        })
    }

    /// Stop without touching the turn again. Dropping the publisher tells
    /// readers no more snapshots are coming.
    pub fn abandon(self) -> DriveOutcome {
        tracing::info!(turn_id = %self.turn.id(), "Turn abandoned");
        DriveOutcome::Abandoned {
            turn_id: self.turn.id(),
        }
    }

    fn seal(mut self, event: TurnEvent) -> DriveOutcome {
        self.apply(event);
        DriveOutcome::Sealed(self.turn)
    }

    fn apply(&mut self, event: TurnEvent) {
        let turn = std::mem::take(&mut self.turn);
        let result = transition(turn, event);
        self.turn = result.turn;

        for effect in result.effects {
            match effect {
                Effect::PublishSnapshot => {
                    self.publisher.send_replace(Arc::new(self.turn.snapshot()));
                }
                Effect::Dropped(reason) => {
                    tracing::debug!(turn_id = %self.turn.id(), ?reason, "Event dropped");
                }
                Effect::Sealed(reason) => {
                    tracing::info!(
                        turn_id = %self.turn.id(),
                        ?reason,
                        reasoning_steps = self.turn.reasoning().len(),
                        content_chars = self.turn.content().chars().count(),
                        "Turn sealed"
                    );
                }
            }
        }
    }
}

async fn next_chunk<S: ChunkSource>(
    source: &mut S,
    stall_timeout: Option<Duration>,
) -> Option<Result<Vec<u8>, TransportError>> {
    match stall_timeout {
        None => source.next_chunk().await,
        Some(limit) => match tokio::time::timeout(limit, source.next_chunk()).await {
            Ok(next) => next,
            Err(_) => Some(Err(TransportError::stalled(limit))),
        },
    }
}

/// Open the stream for a ticket and drive it to the end.
///
/// Cancelling the ticket's token at any point, including while connecting,
/// abandons the turn and drops the connection.
pub async fn run_turn<C: Connector>(
    connector: &C,
    ticket: TurnTicket,
    stall_timeout: Option<Duration>,
) -> DriveOutcome {
    let message = ticket.message().to_string();
    let cancel = ticket.cancel_token();
    let driver = TurnDriver::new(ticket).with_stall_timeout(stall_timeout);

    let opened = tokio::select! {
        biased;
        () = cancel.cancelled() => return driver.abandon(),
        opened = connector.open(&message) => opened,
    };

    match opened {
        Ok(source) => driver.run(source).await,
        Err(e) => driver.fail(e),
    }
}
