//! Parsing of upstream chat-completion stream lines.
//!
//! Upstream lines look like
//! `data: {"choices":[{"delta":{"content":"Hel"}}]}` and the stream ends
//! with `data: [DONE]`. Anything else (blank separators, `:` comments,
//! heartbeats) is ignorable.

use serde::Deserialize;

/// Prefix of an upstream event-data line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of the upstream stream.
pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Option<Vec<ChoicePayload>>,
}

#[derive(Debug, Deserialize)]
struct ChoicePayload {
    #[serde(default)]
    delta: Option<DeltaPayload>,
}

#[derive(Debug, Deserialize)]
struct DeltaPayload {
    #[serde(default)]
    content: Option<String>,
}

impl ChunkPayload {
    /// `choices[0].delta.content`, absent if any link is missing.
    fn content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .delta
            .as_ref()?
            .content
            .as_deref()
    }
}

/// One parsed upstream line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaEvent {
    /// Non-empty text fragment.
    Text(String),
    /// Terminal sentinel.
    Done,
    /// Not a data line, or a data line carrying no text.
    Ignored,
    /// A data line whose payload is not a chunk object.
    Malformed(String),
}

/// Classify a single complete line.
///
/// The sentinel is matched literally before any JSON parsing.
pub fn parse_line(line: &str) -> DeltaEvent {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return DeltaEvent::Ignored;
    };

    if payload == DONE_SENTINEL {
        return DeltaEvent::Done;
    }

    match serde_json::from_str::<ChunkPayload>(payload) {
        Ok(chunk) => match chunk.content() {
            Some(text) if !text.is_empty() => DeltaEvent::Text(text.to_string()),
            _ => DeltaEvent::Ignored,
        },
        Err(e) => DeltaEvent::Malformed(e.to_string()),
    }
}
