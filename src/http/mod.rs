//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, static fallback)
//!     → request.rs (request ID, body shape, presence checks)
//!     → handlers.rs (prompt → upstream → relay)
//!     → response.rs (JSON errors before streaming starts)
//!     → SSE body to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{GenerationRequest, UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
