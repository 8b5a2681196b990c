//! Route handlers.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::http::request::{request_id, GenerationRequest};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::streaming::Relay;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// `GET /api/health`
pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// `POST /api/generate-compliment`
///
/// Validates the body (an absent body counts as missing data), opens the upstream stream and answers with an SSE
/// response fed by a relay task. Errors before the upstream responds are
/// returned as JSON.
pub async fn generate_compliment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_id = request_id(&headers);

    let body = GenerationRequest::from_body(&headers, &body).map_err(|e| {
        tracing::warn!(request_id = %request_id, error = %e, "Rejected request body");
        metrics::record_request("invalid_body");
        ApiError::from(e)
    })?;

    let Some(request) = body.validate() else {
        tracing::warn!(request_id = %request_id, "Missing employee name or attributes");
        metrics::record_request("missing_data");
        return Err(ApiError::MissingData);
    };

    tracing::info!(
        request_id = %request_id,
        attributes = request.attributes.len(),
        lang = request.lang.as_deref().unwrap_or("-"),
        "Generating compliment"
    );

    let prompt = state
        .prompt
        .build(&request.employee_name, &request.attributes, request.lang.as_deref());

    let upstream = state.upstream.stream_completion(prompt).await.map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "Streaming failed");
        metrics::record_request("upstream_error");
        ApiError::from(e)
    })?;

    metrics::record_request("streaming");

    let relay = Relay::new(Duration::from_secs(state.config.upstream.idle_timeout_secs));
    let body = relay.spawn(upstream, request_id);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
            (header::HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        body,
    )
        .into_response())
}
