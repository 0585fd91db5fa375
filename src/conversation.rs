//! Conversation: admission control and history
//!
//! At most one turn is in flight. Submitting while a turn's stream is open is
//! rejected, never queued. Finished turns are kept as sealed snapshots.

use crate::transport::DriveOutcome;
use crate::turn::{Turn, TurnSnapshot};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Errors submitting a message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A response is still streaming; wait for it to finish or clear the conversation")]
    TurnInFlight { turn_id: Uuid },
    #[error("Message is empty")]
    EmptyMessage,
}

/// Everything the reader loop needs to own one turn
#[derive(Debug)]
pub struct TurnTicket {
    turn: Turn,
    publisher: watch::Sender<Arc<TurnSnapshot>>,
    cancel: CancellationToken,
}

impl TurnTicket {
    pub fn turn_id(&self) -> Uuid {
        self.turn.id()
    }

    pub fn message(&self) -> &str {
        self.turn.message()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive every snapshot published for this turn
    pub fn subscribe(&self) -> watch::Receiver<Arc<TurnSnapshot>> {
        self.publisher.subscribe()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Turn,
        watch::Sender<Arc<TurnSnapshot>>,
        CancellationToken,
    ) {
        (self.turn, self.publisher, self.cancel)
    }
}

struct ActiveTurn {
    id: Uuid,
    cancel: CancellationToken,
    snapshots: watch::Receiver<Arc<TurnSnapshot>>,
}

#[derive(Default)]
struct Inner {
    active: Option<ActiveTurn>,
    history: Vec<Arc<TurnSnapshot>>,
}

/// Shared handle to one conversation
#[derive(Clone, Default)]
pub struct Conversation {
    inner: Arc<Mutex<Inner>>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new turn for `message`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::EmptyMessage`] for a blank message and
    /// [`SubmitError::TurnInFlight`] while another turn is still streaming.
    pub fn submit(&self, message: impl Into<String>) -> Result<TurnTicket, SubmitError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(SubmitError::EmptyMessage);
        }

        let mut inner = self.lock();
        if let Some(active) = &inner.active {
            tracing::debug!(turn_id = %active.id, "Rejecting submission while turn in flight");
            return Err(SubmitError::TurnInFlight { turn_id: active.id });
        }

        let turn = Turn::new(message);
        let (publisher, snapshots) = watch::channel(Arc::new(turn.snapshot()));
        let cancel = CancellationToken::new();

        tracing::info!(turn_id = %turn.id(), "Turn submitted");
        inner.active = Some(ActiveTurn {
            id: turn.id(),
            cancel: cancel.clone(),
            snapshots,
        });

        Ok(TurnTicket {
            turn,
            publisher,
            cancel,
        })
    }

    /// Record how a reader loop ended. Returns `true` if the turn was added to
    /// history; results for a turn that was cleared or replaced are discarded.
    pub fn finish(&self, outcome: DriveOutcome) -> bool {
        let mut inner = self.lock();
        let turn_id = outcome.turn_id();
        let is_active = inner.active.as_ref().is_some_and(|a| a.id == turn_id);
        if !is_active {
            tracing::debug!(%turn_id, "Discarding outcome of a turn that is no longer active");
            return false;
        }
        inner.active = None;

        match outcome {
            DriveOutcome::Sealed(turn) => {
                inner.history.push(Arc::new(turn.snapshot()));
                true
            }
            DriveOutcome::Abandoned { .. } => false,
        }
    }

    /// Abandon the in-flight turn, if any. History is kept.
    pub fn abandon_active(&self) -> Option<Uuid> {
        let active = self.lock().active.take()?;
        active.cancel.cancel();
        tracing::info!(turn_id = %active.id, "Abandoning in-flight turn");
        Some(active.id)
    }

    /// Abandon any in-flight turn and forget all history.
    pub fn clear(&self) {
        self.abandon_active();
        self.lock().history.clear();
    }

    pub fn is_busy(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Snapshots of the in-flight turn, if there is one
    pub fn watch_active(&self) -> Option<watch::Receiver<Arc<TurnSnapshot>>> {
        self.lock().active.as_ref().map(|a| a.snapshots.clone())
    }

    /// Sealed turns, oldest first
    pub fn history(&self) -> Vec<Arc<TurnSnapshot>> {
        self.lock().history.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
