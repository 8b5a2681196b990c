//! Error responses.
//!
//! Everything here is produced before streaming headers are committed.
//! Once a stream has started, failures are handled by the relay instead.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Errors surfaced to the client as a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `employeeName` or `attributes` missing.
    #[error("Missing data")]
    MissingData,

    /// Body is not JSON of the expected shape.
    #[error("Invalid request body")]
    InvalidBody(#[from] JsonRejection),

    /// Upstream could not be opened.
    #[error("Streaming failed")]
    Upstream(#[from] UpstreamError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingData | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
