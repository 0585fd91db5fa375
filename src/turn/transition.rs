//! Pure turn transition function

use super::effect::{DropReason, Effect};
use super::event::TurnEvent;
use super::state::{SealReason, Turn, TurnPhase, FALLBACK_ERROR_TEXT};
use crate::protocol::{ReasoningStep, StreamEvent};

/// Result of a transition
#[derive(Debug)]
pub struct TransitionResult {
    pub turn: Turn,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(turn: Turn) -> Self {
        Self {
            turn,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn dropped(turn: Turn, reason: DropReason) -> Self {
        Self::new(turn).with_effect(Effect::Dropped(reason))
    }

    fn published(turn: Turn) -> Self {
        Self::new(turn).with_effect(Effect::PublishSnapshot)
    }

    /// Whether the event changed the observable turn
    pub fn changed(&self) -> bool {
        self.effects.contains(&Effect::PublishSnapshot)
    }
}

/// Apply one event to a turn.
///
/// Pure: the same turn and event always produce the same result, and nothing
/// outside the returned value is touched. The turn is taken by value so the
/// ledger and accumulator are never copied.
pub fn transition(mut turn: Turn, event: TurnEvent) -> TransitionResult {
    if turn.is_sealed() {
        return TransitionResult::dropped(turn, DropReason::TurnSealed);
    }

    match event {
        // Idle/Streaming + content_start -> Streaming, accumulator reset
        TurnEvent::Stream(StreamEvent::ContentStart) => {
            turn.content.clear();
            turn.phase = TurnPhase::Streaming;
            TransitionResult::published(turn)
        }

        TurnEvent::Stream(StreamEvent::ContentChar { ch, id }) => {
            if !turn.ledger.admit_char(id.as_deref()) {
                let id = id.unwrap_or_default();
                return TransitionResult::dropped(turn, DropReason::DuplicateChar { id });
            }
            // A character with no open stream is an implicit start. The text
            // already shown is kept.
            if !turn.is_streaming() {
                tracing::debug!(turn_id = %turn.id, "content_char without content_start");
                turn.phase = TurnPhase::Streaming;
            }
            turn.content.push_str(&ch);
            turn.produced_content = true;
            TransitionResult::published(turn)
        }

        // Streaming + content_end -> Idle; already Idle is a no-op
        TurnEvent::Stream(StreamEvent::ContentEnd) => {
            if turn.is_streaming() {
                turn.phase = TurnPhase::Idle;
                TransitionResult::published(turn)
            } else {
                TransitionResult::new(turn)
            }
        }

        TurnEvent::Stream(StreamEvent::Reasoning { step }) => append_reasoning(turn, step),

        TurnEvent::Stream(StreamEvent::Unknown) => {
            TransitionResult::dropped(turn, DropReason::Unrecognized)
        }

        TurnEvent::StreamClosed => seal(turn, SealReason::Completed),

        TurnEvent::TransportFailed { message } => {
            seal(turn, SealReason::TransportFailed { message })
        }
    }
}

fn append_reasoning(mut turn: Turn, step: ReasoningStep) -> TransitionResult {
    if !turn.ledger.admit_reasoning(&step) {
        return TransitionResult::dropped(turn, DropReason::DuplicateReasoning);
    }
    turn.reasoning.push(step);
    TransitionResult::published(turn)
}

/// Close of any kind ends the character stream first, then freezes the turn.
/// The fallback text is only for turns that never produced a character.
fn seal(mut turn: Turn, reason: SealReason) -> TransitionResult {
    if !turn.produced_content {
        turn.error_text = Some(FALLBACK_ERROR_TEXT.to_string());
    }
    turn.phase = TurnPhase::Sealed(reason.clone());
    TransitionResult::published(turn).with_effect(Effect::Sealed(reason))
}
