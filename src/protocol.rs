//! Streaming wire protocol
//!
//! Bytes arrive in arbitrary chunks; the [`FrameAssembler`] cuts them into
//! newline-terminated frames and [`parse_frame`] decodes each `data: {...}`
//! frame into a [`StreamEvent`].

mod event;
mod frame;
mod step;

#[cfg(test)]
mod proptests;

pub use event::{parse_frame, IgnoreReason, ParsedFrame, ProtocolError, StreamEvent, DATA_MARKER};
pub use frame::FrameAssembler;
pub use step::{ReasoningStep, StepKind};
