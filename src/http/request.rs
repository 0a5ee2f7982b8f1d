//! Request handling.
//!
//! # Responsibilities
//! - Expose the request ID assigned by the middleware stack
//! - Enforce Content-Length semantics before reading a body
//! - Decode JSON bodies, pass other content types through as raw bytes
//!
//! # Design Decisions
//! - Content-Length is mandatory for writes; chunked bodies are refused with 411
//! - A zero length means "no input", not an empty record
//! - Malformed JSON is reported as "no input" rather than as a parse error

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request};
use serde_json::Value;
use tower_http::request_id::RequestId;

use crate::http::error::ApiError;
use crate::store::Record;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Media type that triggers JSON decoding.
pub const APPLICATION_JSON: &str = "application/json";

/// Request ID set by `SetRequestIdLayer`, falling back to the raw header.
pub fn request_id<B>(request: &Request<B>) -> Option<&str> {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
        })
}

/// Decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Body sent as `application/json` and parsed successfully.
    Json(Value),
    /// Body sent with any other content type.
    Raw(Bytes),
}

impl Input {
    /// Convert into a storable record. Raw input must be UTF-8.
    pub fn into_record(self) -> Option<Record> {
        match self {
            Input::Json(value) => Some(Record::Json(value)),
            Input::Raw(bytes) => String::from_utf8(bytes.to_vec()).ok().map(Record::Text),
        }
    }
}

/// Parse the Content-Length header.
pub fn content_length(headers: &HeaderMap) -> Result<usize, ApiError> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok())
        .ok_or(ApiError::LengthRequired)
}

/// Whether the Content-Type media type is `application/json`.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(APPLICATION_JSON))
        .unwrap_or(false)
}

/// Read the request body.
///
/// Returns `Ok(None)` when there is no usable input: a zero Content-Length or
/// a JSON body that fails to parse.
pub async fn read_input(request: Request<Body>, max_bytes: usize) -> Result<Option<Input>, ApiError> {
    let length = content_length(request.headers())?;
    if length == 0 {
        return Ok(None);
    }
    if length > max_bytes {
        return Err(ApiError::PayloadTooLarge {
            length,
            limit: max_bytes,
        });
    }

    let json = is_json(request.headers());
    let bytes = axum::body::to_bytes(request.into_body(), max_bytes)
        .await
        .map_err(|e| ApiError::BodyRead(e.to_string()))?;

    if !json {
        return Ok(Some(Input::Raw(bytes)));
    }

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(Some(Input::Json(value))),
        Err(e) => {
            tracing::debug!(error = %e, "Discarding undecodable JSON body");
            Ok(None)
        }
    }
}
