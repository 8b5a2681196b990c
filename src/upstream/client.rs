//! HTTP client for the upstream chat-completion API.
//!
//! # Responsibilities
//! - Build the streaming request (model, temperature, prompt)
//! - Attach the bearer credential
//! - Map connect errors, timeouts and non-success statuses to `UpstreamError`
//! - Hand back the raw byte stream for the relay
//!
//! # Design Decisions
//! - One attempt per request, no retries
//! - Only time-to-headers is bounded here; the body is bounded by the
//!   relay's idle timeout

use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Client;
use tracing::{debug, error};

use crate::config::UpstreamConfig;
use crate::upstream::types::{ChatCompletionRequest, UpstreamError};

/// Raw upstream response body.
pub type UpstreamStream = BoxStream<'static, Result<Bytes, reqwest::Error>>;

/// Upper bound on how much of an error body is kept for logs.
const MAX_ERROR_BODY: usize = 512;

/// Upstream chat-completion client.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    endpoint: String,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Create a client from configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder =
            Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Open a streaming completion for `prompt`.
    ///
    /// Resolves once response headers arrive with a success status.
    pub async fn stream_completion(
        &self,
        prompt: String,
    ) -> Result<UpstreamStream, UpstreamError> {
        let body = ChatCompletionRequest::streaming(
            &self.config.model,
            self.config.temperature,
            prompt,
        );

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, model = %self.config.model, "Opening upstream stream");

        let timeout_secs = self.config.request_timeout_secs;
        let response = tokio::time::timeout(Duration::from_secs(timeout_secs), request.send())
            .await
            .map_err(|_| UpstreamError::Timeout(timeout_secs))??;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            error!(status = status.as_u16(), body = %body, "Upstream rejected request");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes_stream().boxed())
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
