//! Incremental SSE frame parsing
//!
//! Network chunks can split an SSE line anywhere, including in the middle of
//! a multi-byte UTF-8 character, so the parser buffers raw bytes across
//! `push` calls and decodes only complete lines. Malformed frames are skipped
//! with a warning; they never abort the stream.

use serde::Deserialize;

/// A parsed stream event
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// A content delta from `choices[0].delta.content`
    Delta(String),
    /// The `data: [DONE]` sentinel
    Done,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Buffering SSE parser
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk, returning every event completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        // A character split across chunks stays buffered as raw bytes until
        // its line completes
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw[..line_end]);
            let line = line.trim();

            if line.is_empty() {
                continue;
            }
            let Some(data) = line.strip_prefix("data: ") else {
                continue;
            };
            if data == "[DONE]" {
                events.push(SseEvent::Done);
                continue;
            }
            match serde_json::from_str::<StreamChunk>(data) {
                Ok(chunk) => {
                    if let Some(content) = chunk
                        .choices
                        .first()
                        .and_then(|c| c.delta.as_ref())
                        .and_then(|d| d.content.clone())
                    {
                        if !content.is_empty() {
                            events.push(SseEvent::Delta(content));
                        }
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, frame = %data, "Skipping malformed SSE frame");
                },
            }
        }
        events
    }
}
