//! Per-turn message state machine
//!
//! Elm-style: [`transition`] takes the current [`Turn`] and one [`TurnEvent`]
//! and returns the next turn plus the effects the caller must carry out.

mod effect;
mod event;
mod ledger;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{DropReason, Effect};
pub use event::TurnEvent;
pub use ledger::{DedupLedger, ReasoningKey};
pub use state::{SealReason, Turn, TurnPhase, TurnSnapshot, FALLBACK_ERROR_TEXT};
pub use transition::{transition, TransitionResult};
