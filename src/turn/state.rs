//! Turn state types

use super::ledger::DedupLedger;
use crate::protocol::ReasoningStep;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown in place of a response when a turn ends without producing any text
pub const FALLBACK_ERROR_TEXT: &str =
    "Sorry, the agent did not finish responding. Please try again.";

/// Why a turn was sealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SealReason {
    /// The connection closed normally
    Completed,
    /// The connection failed or was given up on
    TransportFailed { message: String },
}

/// Streaming sub-state of a turn
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnPhase {
    /// No character stream open
    #[default]
    Idle,
    /// Between `content_start` and `content_end`
    Streaming,
    /// Immutable; no further events are applied
    Sealed(SealReason),
}

/// One user request and the agent response being reassembled for it.
///
/// Only [`transition`](super::transition) mutates a turn. The default value
/// is an empty, nil-id turn.
#[derive(Debug, Clone, Default)]
pub struct Turn {
    pub(super) id: Uuid,
    pub(super) message: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) phase: TurnPhase,
    pub(super) reasoning: Vec<ReasoningStep>,
    pub(super) content: String,
    /// Set once any character is accepted; survives `content_start` resets
    pub(super) produced_content: bool,
    pub(super) error_text: Option<String>,
    pub(super) ledger: DedupLedger,
}

impl Turn {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            created_at: Utc::now(),
            phase: TurnPhase::Idle,
            reasoning: Vec::new(),
            content: String::new(),
            produced_content: false,
            error_text: None,
            ledger: DedupLedger::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn reasoning(&self) -> &[ReasoningStep] {
        &self.reasoning
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether any character was ever accepted, even if later reset
    pub fn produced_content(&self) -> bool {
        self.produced_content
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.phase, TurnPhase::Streaming)
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self.phase, TurnPhase::Sealed(_))
    }

    pub fn seal_reason(&self) -> Option<&SealReason> {
        match &self.phase {
            TurnPhase::Sealed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Observable copy of the turn, without the dedup ledger
    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            id: self.id,
            message: self.message.clone(),
            created_at: self.created_at,
            reasoning: self.reasoning.clone(),
            content: self.content.clone(),
            streaming: self.is_streaming(),
            sealed: self.is_sealed(),
            seal_reason: self.seal_reason().cloned(),
            error: self.error_text.clone(),
        }
    }
}

/// What readers of a turn see. Published whole, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub reasoning: Vec<ReasoningStep>,
    pub content: String,
    pub streaming: bool,
    pub sealed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal_reason: Option<SealReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
