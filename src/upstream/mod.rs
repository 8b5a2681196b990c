//! Upstream LLM integration.
//!
//! # Data Flow
//! ```text
//! prompt text
//!     → types.rs (ChatCompletionRequest, stream: true)
//!     → client.rs (POST {base_url}/chat/completions, bearer auth)
//!     → byte stream handed to streaming::relay
//! ```

pub mod client;
pub mod types;

pub use client::{UpstreamClient, UpstreamStream};
pub use types::{ChatCompletionRequest, UpstreamError};
