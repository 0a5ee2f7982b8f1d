//! Response handling and encoding.
//!
//! # Responsibilities
//! - Carry handler results as a [`Reply`] (status, Location, optional body)
//! - Resolve the body variant to a content type at encode time
//! - Set Content-Type and Content-Length from the encoded bytes
//!
//! # Design Decisions
//! - Only two body shapes exist: text and structured JSON
//! - Errors are answered with their status and no body

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::request::APPLICATION_JSON;
use crate::store::Record;

/// Content type for text bodies.
pub const TEXT_PLAIN: &str = "text/plain";

/// A response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Sent verbatim as `text/plain`.
    Text(String),
    /// Serialized as `application/json`.
    Structured(Value),
}

impl ResponseBody {
    /// Serialize any value into a structured body.
    pub fn structured<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Ok(ResponseBody::Structured(serde_json::to_value(value)?))
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseBody::Text(_) => TEXT_PLAIN,
            ResponseBody::Structured(_) => APPLICATION_JSON,
        }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ApiError> {
        match self {
            ResponseBody::Text(text) => Ok(text.as_bytes().to_vec()),
            ResponseBody::Structured(value) => Ok(serde_json::to_vec(value)?),
        }
    }
}

impl From<Record> for ResponseBody {
    fn from(record: Record) -> Self {
        match record {
            Record::Json(value) => ResponseBody::Structured(value),
            Record::Text(text) => ResponseBody::Text(text),
        }
    }
}

/// A pending response produced by a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Option<ResponseBody>,
}

impl Reply {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            location: None,
            body: None,
        }
    }

    /// `200 OK` without a body.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }

    /// Build the wire response.
    pub fn into_http(self) -> Result<Response, ApiError> {
        let mut builder = Response::builder().status(self.status);
        if let Some(location) = &self.location {
            builder = builder.header(header::LOCATION, location.as_str());
        }

        let response = match &self.body {
            None => builder.body(Body::empty()),
            Some(body) => {
                let bytes = body.encode()?;
                builder
                    .header(header::CONTENT_TYPE, body.content_type())
                    .header(header::CONTENT_LENGTH, bytes.len().to_string())
                    .body(Body::from(bytes))
            }
        };
        response.map_err(|e| ApiError::Response(e.to_string()))
    }
}

/// Render a handler outcome. Never fails: encoding problems become a 500.
pub fn render(outcome: Result<Reply, ApiError>) -> Response {
    match outcome.and_then(Reply::into_http) {
        Ok(response) => response,
        Err(err) => {
            if err.status_code().is_server_error() {
                tracing::error!(error = %err, "Request failed");
            } else {
                tracing::debug!(error = %err, "Request rejected");
            }
            err.status_code().into_response()
        }
    }
}
