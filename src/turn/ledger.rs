//! Duplicate suppression

use crate::protocol::ReasoningStep;
use std::collections::HashSet;

/// Identity of a reasoning step: its kind plus its primary text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReasoningKey {
    pub kind: String,
    pub text: String,
}

impl ReasoningKey {
    pub fn of(step: &ReasoningStep) -> Self {
        Self {
            kind: step.kind.as_str().to_string(),
            text: step.primary_text().to_string(),
        }
    }
}

/// Identities already applied to one turn.
///
/// Lives inside the [`Turn`](super::Turn) it guards, so a new turn always
/// starts with an empty ledger.
#[derive(Debug, Clone, Default)]
pub struct DedupLedger {
    char_ids: HashSet<String>,
    reasoning_keys: HashSet<ReasoningKey>,
}

impl DedupLedger {
    /// Record a character id. Returns `false` if it was already seen.
    /// Characters without an id cannot be deduplicated and are always admitted.
    pub fn admit_char(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) => self.char_ids.insert(id.to_string()),
            None => true,
        }
    }

    /// Record a reasoning step. Returns `false` if its key was already seen.
    pub fn admit_reasoning(&mut self, step: &ReasoningStep) -> bool {
        self.reasoning_keys.insert(ReasoningKey::of(step))
    }

    pub fn seen_char_ids(&self) -> usize {
        self.char_ids.len()
    }

    pub fn seen_reasoning_keys(&self) -> usize {
        self.reasoning_keys.len()
    }
}
