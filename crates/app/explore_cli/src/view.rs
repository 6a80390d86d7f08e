//! Terminal rendering of the transcript.

use std::io::Write;

use explore_core::models::{ChatMessage, Role};
use explore_core::transcript::TranscriptView;

/// Prints assistant text as it streams in.
///
/// Only the part of the last assistant message not yet printed is written on
/// each render, so a reply appears token by token.
pub struct TerminalView<W: Write> {
    out: W,
    printed: usize,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, printed: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TranscriptView for TerminalView<W> {
    fn render(&mut self, transcript: &[ChatMessage]) {
        let Some(last) = transcript.last() else {
            return;
        };
        if last.role != Role::Assistant {
            return;
        }
        // A fresh placeholder starts a new reply.
        if last.content.len() < self.printed {
            self.printed = 0;
        }
        let fresh = &last.content[self.printed..];
        if fresh.is_empty() {
            return;
        }
        if let Err(e) = self.out.write_all(fresh.as_bytes()) {
            log::warn!("failed to write reply: {e}");
            return;
        }
        self.printed = last.content.len();
    }

    fn scroll_to_latest(&mut self) {
        if let Err(e) = self.out.flush() {
            log::warn!("failed to flush terminal: {e}");
        }
    }
}
