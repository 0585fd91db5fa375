//! Effects produced by turn transitions

use super::state::SealReason;

/// Effects to be carried out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The observable turn changed; replace the published snapshot
    PublishSnapshot,
    /// The event was not applied
    Dropped(DropReason),
    /// The turn is now immutable
    Sealed(SealReason),
}

/// Why an event left the turn untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// `content_char` whose id was already applied in this turn
    DuplicateChar { id: String },
    /// `reasoning` whose (kind, text) was already applied in this turn
    DuplicateReasoning,
    /// Discriminator this client does not understand
    Unrecognized,
    /// The turn was already sealed
    TurnSealed,
}
