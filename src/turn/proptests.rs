//! Property-based tests for the turn state machine
//!
//! These check that the turn invariants hold across arbitrary event orders.

use super::*;
use crate::protocol::{ReasoningStep, StepKind, StreamEvent};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_kind() -> impl Strategy<Value = StepKind> {
    prop_oneof![
        Just(StepKind::Analysis),
        Just(StepKind::ToolSelection),
        Just(StepKind::ToolExecution),
        Just(StepKind::ToolResult),
        Just(StepKind::Conclusion),
        "[a-z]{4,8}".prop_map(StepKind::Other),
    ]
}

fn arb_step() -> impl Strategy<Value = ReasoningStep> {
    // Small text alphabet so repeats are common
    (arb_kind(), "[ab]{0,2}", any::<bool>()).prop_map(|(kind, text, as_content)| {
        let step = ReasoningStep::new(kind);
        if as_content {
            step.with_content(text)
        } else {
            step.with_reasoning(text)
        }
    })
}

fn arb_stream_event() -> impl Strategy<Value = StreamEvent> {
    prop_oneof![
        1 => Just(StreamEvent::ContentStart),
        1 => Just(StreamEvent::ContentEnd),
        1 => Just(StreamEvent::Unknown),
        4 => ("[a-z]", proptest::option::of("[0-9]{1,2}"))
            .prop_map(|(ch, id)| StreamEvent::content_char(ch, id)),
        2 => arb_step().prop_map(StreamEvent::reasoning),
    ]
}

fn run(events: &[StreamEvent]) -> Turn {
    events.iter().cloned().fold(Turn::new("prop"), |turn, event| {
        transition(turn, event.into()).turn
    })
}

/// Straight-line model of the content invariants, independent of `transition`.
/// Returns the text, the streaming flag and whether any character was accepted.
fn expected_content(events: &[StreamEvent]) -> (String, bool, bool) {
    let mut seen = HashSet::new();
    let mut text = String::new();
    let mut streaming = false;
    let mut produced = false;
    for event in events {
        match event {
            StreamEvent::ContentStart => {
                text.clear();
                streaming = true;
            }
            StreamEvent::ContentEnd => streaming = false,
            StreamEvent::ContentChar { ch, id } => {
                let fresh = id.as_ref().map_or(true, |id| seen.insert(id.clone()));
                if fresh {
                    text.push_str(ch);
                    streaming = true;
                    produced = true;
                }
            }
            StreamEvent::Reasoning { .. } | StreamEvent::Unknown => {}
        }
    }
    (text, streaming, produced)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_content_matches_model(events in proptest::collection::vec(arb_stream_event(), 0..60)) {
        let turn = run(&events);
        let (text, streaming, _) = expected_content(&events);
        prop_assert_eq!(turn.content(), text.as_str());
        prop_assert_eq!(turn.is_streaming(), streaming);
    }

    #[test]
    fn prop_reasoning_keys_unique(events in proptest::collection::vec(arb_stream_event(), 0..60)) {
        let turn = run(&events);
        let keys: HashSet<ReasoningKey> = turn.reasoning().iter().map(ReasoningKey::of).collect();
        prop_assert_eq!(keys.len(), turn.reasoning().len());
    }

    #[test]
    fn prop_redelivered_char_is_idempotent(
        events in proptest::collection::vec(arb_stream_event(), 0..40),
        ch in "[a-z]",
        id in "[0-9]{3}",
    ) {
        let event = StreamEvent::content_char(ch, Some(format!("x{id}")));
        let mut once = events.clone();
        once.push(event.clone());
        let mut twice = once.clone();
        twice.push(event);
        let (once, twice) = (run(&once), run(&twice));
        prop_assert_eq!(once.content(), twice.content());
    }

    #[test]
    fn prop_redelivered_reasoning_appears_once(
        others in proptest::collection::vec(arb_step(), 0..20),
        step in arb_step(),
        first in 0usize..20,
        second in 0usize..20,
    ) {
        let mut events: Vec<StreamEvent> = others.into_iter().map(StreamEvent::reasoning).collect();
        let a = first.min(events.len());
        events.insert(a, StreamEvent::reasoning(step.clone()));
        let b = second.min(events.len());
        events.insert(b, StreamEvent::reasoning(step.clone()));

        let turn = run(&events);
        let key = ReasoningKey::of(&step);
        let count = turn.reasoning().iter().filter(|s| ReasoningKey::of(s) == key).count();
        prop_assert_eq!(count, 1);
    }

    #[test]
    fn prop_content_start_always_resets(
        events in proptest::collection::vec(arb_stream_event(), 0..40),
    ) {
        let turn = run(&events);
        let result = transition(turn, StreamEvent::ContentStart.into());
        prop_assert_eq!(result.turn.content(), "");
        prop_assert!(result.turn.is_streaming());
    }

    #[test]
    fn prop_sealed_turn_is_frozen(
        before in proptest::collection::vec(arb_stream_event(), 0..30),
        after in proptest::collection::vec(arb_stream_event(), 0..30),
    ) {
        let sealed = transition(run(&before), TurnEvent::StreamClosed).turn;
        let snapshot = sealed.snapshot();
        let (_, _, produced) = expected_content(&before);
        prop_assert!(!snapshot.streaming);
        prop_assert_eq!(snapshot.error.is_some(), !produced);

        let end = after.into_iter().fold(sealed, |turn, event| transition(turn, event.into()).turn);
        prop_assert_eq!(end.snapshot(), snapshot);
    }
}
