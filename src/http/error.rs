//! Request-level error taxonomy.
//!
//! Every variant maps to a status code and is answered without a body.
//! None of them is fatal to the process.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced to clients as HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No declared template matches the path for this method.
    #[error("no route matches {method} {path}")]
    NoRoute { method: Method, path: String },

    /// The method has no routes at all.
    #[error("method {0} is not implemented")]
    NotImplemented(Method),

    /// The path is a known shape but the operation is not defined for it.
    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: Method, path: String },

    /// No record under the key.
    #[error("record {0:?} not found")]
    NotFound(String),

    /// Body absent, empty or not decodable.
    #[error("request body missing or unusable")]
    BadInput,

    /// Content-Length missing or not a number.
    #[error("content-length header missing or invalid")]
    LengthRequired,

    /// Declared body length exceeds the configured limit.
    #[error("request body of {length} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { length: usize, limit: usize },

    /// The body stream failed mid-read.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// A route handler ran without the capture it declares.
    #[error("route is missing path parameter {0:?}")]
    MissingParam(&'static str),

    /// The store cannot mint another key.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A structured body could not be serialized.
    #[error("failed to encode response body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The response could not be assembled (e.g. an unrepresentable header).
    #[error("failed to build response: {0}")]
    Response(String),
}

impl ApiError {
    /// Status code sent for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoRoute { .. } | ApiError::BadInput | ApiError::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::LengthRequired => StatusCode::LENGTH_REQUIRED,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::MissingParam(_) | ApiError::Encode(_) | ApiError::Response(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
