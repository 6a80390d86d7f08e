// @zen-component: CHAT-RecordParser
//
//! Incremental parser for the upstream completion stream.
//!
//! The upstream speaks an SSE-style, newline-delimited format:
//!
//! ```text
//! : OPENROUTER PROCESSING
//!
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//!
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//!
//! data: [DONE]
//! ```
//!
//! [`RecordParser`] is fed raw network chunks and returns the text fragments
//! they complete. It performs no I/O, so it is driven by the relay stream in
//! [`crate::upstream`] and exercised directly by tests.

use serde::Deserialize;
use tracing::{trace, warn};

use crate::decode::Utf8Decoder;

/// Prefix of a record carrying a JSON payload.
pub const DATA_PREFIX: &str = "data:";

/// Payload marking the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    #[serde(default)]
    message: Option<String>,
}

/// Classification of a single stream record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A non-empty text delta to forward downstream.
    Fragment(String),
    /// The end-of-stream sentinel.
    Done,
    /// Anything else: blank, comment, unknown field, empty delta, malformed JSON.
    Skip,
}

/// Classify one record (a line without its terminator).
///
/// Malformed payloads are logged and reported as [`Record::Skip`]; they never
/// abort the stream.
pub fn parse_record(line: &str) -> Record {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Record::Skip;
    }
    if line.trim() == DONE_SENTINEL {
        return Record::Done;
    }

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        trace!(record = line, "ignoring non-data record");
        return Record::Skip;
    };
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    if payload.trim() == DONE_SENTINEL {
        return Record::Done;
    }

    let chunk = match serde_json::from_str::<CompletionChunk>(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!("Failed to parse upstream record as JSON: {e}");
            return Record::Skip;
        }
    };

    if let Some(error) = chunk.error {
        warn!(
            message = error.message.as_deref().unwrap_or("<none>"),
            "upstream reported an error mid-stream"
        );
        return Record::Skip;
    }

    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty())
        .map_or(Record::Skip, Record::Fragment)
}

/// Output of one parser step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Feed {
    /// Fragments completed by this step, in upstream order.
    pub fragments: Vec<String>,
    /// No further fragments will be produced: the sentinel was seen or the
    /// parser has been finished.
    pub done: bool,
}

/// Stateful record parser.
///
/// Holds the residual between chunks: bytes of an incomplete UTF-8 sequence
/// and the text of an incomplete line.
#[derive(Debug, Default)]
pub struct RecordParser {
    decoder: Utf8Decoder,
    line_buf: String,
    done: bool,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the parser has stopped producing fragments.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Consume the next raw chunk from upstream.
    ///
    /// Once the sentinel is seen, the rest of the chunk and every later chunk
    /// are discarded.
    pub fn feed(&mut self, chunk: &[u8]) -> Feed {
        let mut feed = Feed::default();
        if self.done {
            feed.done = true;
            return feed;
        }

        let text = self.decoder.decode(chunk);
        self.line_buf.push_str(&text);

        while let Some(pos) = self.line_buf.find('\n') {
            let line: String = self.line_buf.drain(..=pos).collect();
            self.accept(&line[..line.len() - 1], &mut feed);
            if self.done {
                self.line_buf.clear();
                break;
            }
        }

        feed.done = self.done;
        feed
    }

    /// Flush the residual at end of upstream.
    ///
    /// A final line without a trailing newline is still processed as a record.
    pub fn finish(&mut self) -> Feed {
        let mut feed = Feed::default();
        if !self.done {
            let tail = self.decoder.finish();
            self.line_buf.push_str(&tail);
            let line = std::mem::take(&mut self.line_buf);
            self.accept(&line, &mut feed);
            self.done = true;
        }
        feed.done = true;
        feed
    }

    fn accept(&mut self, line: &str, feed: &mut Feed) {
        match parse_record(line) {
            Record::Fragment(text) => feed.fragments.push(text),
            Record::Done => self.done = true,
            Record::Skip => {}
        }
    }
}
