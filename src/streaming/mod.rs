//! Streaming re-framing subsystem.
//!
//! # Data Flow
//! ```text
//! upstream bytes (arbitrary chunk boundaries)
//!     → framer.rs (accumulate bytes, emit complete lines, retain remainder)
//!     → delta.rs  (data: prefix, [DONE] sentinel, choices[0].delta.content)
//!     → frame.rs  (newline → <br> markup, SSE encoding)
//!     → relay.rs  (loop, cancellation, idle timeout) → response body
//! ```
//!
//! # Design Decisions
//! - Framing works on bytes; lines are decoded only once complete
//! - The sentinel is matched literally before any JSON parsing
//! - Malformed data lines are logged and skipped, never fatal
//! - A partial line left when the upstream closes is discarded

pub mod delta;
pub mod frame;
pub mod framer;
pub mod relay;

pub use delta::{parse_line, DeltaEvent};
pub use frame::{to_markup, OutboundFrame};
pub use framer::LineFramer;
pub use relay::{Relay, RelayError, RelayOutcome};
