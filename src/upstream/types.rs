//! Wire types for the upstream chat-completion API.

use serde::Serialize;
use thiserror::Error;

/// Streaming chat-completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub stream: bool,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatCompletionRequest {
    /// Single user message, streaming enabled.
    pub fn streaming(model: &str, temperature: f32, prompt: String) -> Self {
        Self {
            model: model.to_string(),
            stream: true,
            temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

/// Errors opening the upstream stream. All occur before any response
/// headers reach the client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream did not respond within {0} seconds")]
    Timeout(u64),
}
