//! Request identification and the generation request body.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Read it back in handlers for log correlation
//! - Define the JSON body accepted by the generation endpoint

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use axum::Json;
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of an inbound request, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Body of `POST /api/generate-compliment`.
///
/// Every field is optional at the type level so that missing data maps to
/// a descriptive 400 rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
    #[serde(default)]
    pub lang: Option<String>,
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// A request that passed the presence checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    pub employee_name: String,
    pub attributes: Vec<String>,
    pub lang: Option<String>,
}

impl GenerationRequest {
    /// Decode a raw body.
    ///
    /// A blank body or one not declared as JSON carries no fields and yields
    /// an empty request. Only a JSON body that fails to parse is rejected.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self, JsonRejection> {
        if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Json::<Self>::from_bytes(body).map(|Json(request)| request)
    }

    /// Check the two required fields. An empty name counts as missing; an
    /// empty attribute list is left for the caller to reject.
    pub fn validate(self) -> Option<ValidRequest> {
        let employee_name = self.employee_name.filter(|n| !n.is_empty())?;
        let attributes = self.attributes?;
        Some(ValidRequest {
            employee_name,
            attributes,
            lang: self.lang,
        })
    }
}
