//! The line-oriented transcript protocol.
//!
//! Every message is a single line on an append-only channel; no line is ever
//! retracted or rewritten. Sinks render events through [`render_event`] so
//! the wire format is identical regardless of where the lines end up.

use crate::types::TranscriptEvent;

/// Emitted once, after the capture stream is open and before the first frame.
pub const READY: &str = "READY";

/// Emitted once, after resources are released, immediately before exit.
pub const TERMINATE: &str = "TERMINATE";

pub const PARTIAL_PREFIX: &str = "Partial:";
pub const FINAL_PREFIX: &str = "Text:";

pub fn render_event(event: &TranscriptEvent) -> String {
    match event {
        TranscriptEvent::Partial { text } => format!("{PARTIAL_PREFIX} {text}"),
        TranscriptEvent::Final { text } => format!("{FINAL_PREFIX} {text}"),
    }
}
