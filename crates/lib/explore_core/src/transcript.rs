// @zen-component: CHAT-TranscriptController
//
//! Client-side transcript controller.
//!
//! Owns the ordered list of chat turns and the "awaiting response" flag. The
//! controller does no I/O: [`TranscriptController::submit`] returns the request
//! payload for the caller to send, and the caller reports the response through
//! [`on_chunk`](TranscriptController::on_chunk),
//! [`on_complete`](TranscriptController::on_complete) and
//! [`on_error`](TranscriptController::on_error).
//!
//! ```text
//! idle --submit--> sending --complete/error--> idle
//! ```

use tracing::{debug, error};

use crate::decode::Utf8Decoder;
use crate::models::{ChatMessage, Role};

/// Greeting shown before the visitor types anything.
pub const GREETING: &str = "Welcome! How can I help you today?";

/// Rendering hooks notified by the controller.
pub trait TranscriptView {
    /// The transcript changed.
    fn render(&mut self, transcript: &[ChatMessage]);

    /// Bring the latest message into view.
    fn scroll_to_latest(&mut self) {}

    /// Empty the text input after a message was accepted.
    fn clear_input(&mut self) {}
}

/// A view that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl TranscriptView for NullView {
    fn render(&mut self, _transcript: &[ChatMessage]) {}
}

/// Owner of the chat transcript for one widget instance.
#[derive(Debug)]
pub struct TranscriptController<V> {
    messages: Vec<ChatMessage>,
    in_flight: bool,
    decoder: Utf8Decoder,
    view: V,
}

impl<V: TranscriptView> TranscriptController<V> {
    /// Start with the assistant greeting.
    pub fn new(view: V) -> Self {
        Self::with_messages(view, vec![ChatMessage::assistant(GREETING)])
    }

    /// Start with an empty transcript.
    pub fn empty(view: V) -> Self {
        Self::with_messages(view, Vec::new())
    }

    pub fn with_messages(view: V, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            in_flight: false,
            decoder: Utf8Decoder::new(),
            view,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a response is currently streaming.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Accept a user message and start a turn.
    ///
    /// Returns the payload to POST to the relay: every turn so far including
    /// the new user message, but not the empty assistant placeholder. Returns
    /// `None` without touching the transcript when a response is already in
    /// flight or `text` is blank.
    pub fn submit(&mut self, text: &str) -> Option<Vec<ChatMessage>> {
        if self.in_flight {
            debug!("submit ignored: response already in flight");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.view.clear_input();
        let payload = self.messages.clone();

        self.messages.push(ChatMessage::assistant(""));
        self.in_flight = true;
        self.decoder = Utf8Decoder::new();
        self.refresh();

        Some(payload)
    }

    /// Append a chunk of the streamed reply to the placeholder.
    pub fn on_chunk(&mut self, chunk: &[u8]) {
        if !self.in_flight {
            debug!("chunk ignored: no response in flight");
            return;
        }
        let text = self.decoder.decode(chunk);
        self.append(&text);
    }

    /// The reply stream closed normally.
    pub fn on_complete(&mut self) {
        self.finish();
    }

    /// The reply stream failed. Partial content is kept as-is.
    pub fn on_error(&mut self, err: &dyn std::error::Error) {
        error!("Chat response failed: {err}");
        self.finish();
    }

    fn finish(&mut self) {
        if !self.in_flight {
            return;
        }
        let tail = self.decoder.finish();
        self.append(&tail);
        self.in_flight = false;
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => last.content.push_str(text),
            _ => self.messages.push(ChatMessage::assistant(text)),
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.view.render(&self.messages);
        self.view.scroll_to_latest();
    }
}
