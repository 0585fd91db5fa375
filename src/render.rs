//! Plain-text rendering of a live turn
//!
//! Snapshots arrive whole; the renderer diffs each one against what it has
//! already written and returns only the new text, so it can append to a
//! terminal.

use crate::protocol::ReasoningStep;
use crate::turn::{SealReason, TurnSnapshot};
use std::fmt::Write;

#[derive(Debug, Default)]
pub struct TerminalRenderer {
    show_reasoning: bool,
    steps_written: usize,
    content_written: String,
    /// Cursor is not at the start of a line
    mid_line: bool,
    finished: bool,
}

impl TerminalRenderer {
    pub fn new(show_reasoning: bool) -> Self {
        Self {
            show_reasoning,
            ..Self::default()
        }
    }

    /// Text to append for this snapshot. Empty once the sealed snapshot has
    /// been rendered.
    pub fn update(&mut self, snapshot: &TurnSnapshot) -> String {
        let mut out = String::new();
        if self.finished {
            return out;
        }

        if self.show_reasoning && snapshot.reasoning.len() > self.steps_written {
            self.break_line(&mut out);
            for step in snapshot.reasoning.iter().skip(self.steps_written) {
                let _ = writeln!(out, "  [{}] {}", step.kind.label(), step_text(step));
            }
        }
        self.steps_written = snapshot.reasoning.len();

        if let Some(rest) = snapshot.content.strip_prefix(self.content_written.as_str()) {
            if !rest.is_empty() {
                out.push_str(rest);
                self.content_written.push_str(rest);
                self.mid_line = !rest.ends_with('\n');
            }
        } else {
            // content_start reset the text; start over on a fresh line
            self.break_line(&mut out);
            out.push_str(&snapshot.content);
            self.content_written.clone_from(&snapshot.content);
            self.mid_line = !snapshot.content.is_empty() && !snapshot.content.ends_with('\n');
        }

        if snapshot.sealed {
            self.break_line(&mut out);
            if let Some(error) = &snapshot.error {
                let _ = writeln!(out, "[error] {error}");
            } else if let Some(SealReason::TransportFailed { message }) = &snapshot.seal_reason {
                let _ = writeln!(out, "[connection lost: {message}]");
            }
            self.finished = true;
        }

        out
    }

    fn break_line(&mut self, out: &mut String) {
        if self.mid_line {
            out.push('\n');
            self.mid_line = false;
        }
    }
}

fn step_text(step: &ReasoningStep) -> String {
    let text = step.primary_text();
    if !text.is_empty() {
        return text.to_string();
    }
    match &step.tool {
        Some(tool) => format!("Using {tool}"),
        None => String::new(),
    }
}

/// One finished turn, for history listings
pub fn render_sealed(snapshot: &TurnSnapshot, show_reasoning: bool) -> String {
    let mut renderer = TerminalRenderer::new(show_reasoning);
    let mut out = format!("> {}\n", snapshot.message);
    out.push_str(&renderer.update(snapshot));
    out
}
