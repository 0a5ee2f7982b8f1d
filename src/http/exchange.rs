//! Per-request lifecycle.
//!
//! # States
//! ```text
//! enter() ──▶ Unmatched ──mark_matched()──▶ Matched
//!                 │                            │
//!                 └────────── finish() ────────┴──▶ Finalized
//! ```
//!
//! `finish` consumes the exchange, so a response is built exactly once.
//! An exchange dropped before `finish` (handler panic, timeout cancellation)
//! is logged and counted.

use std::time::Instant;

use axum::http::{Method, Request};
use axum::response::Response;

use crate::http::error::ApiError;
use crate::http::request::request_id;
use crate::http::response::{render, Reply};
use crate::observability::metrics;
use crate::routing::Pattern;

/// Route label used before any template matched.
const UNMATCHED_ROUTE: &str = "none";

/// Lifecycle phase of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No route has consumed the request yet.
    Unmatched,
    /// A route matched; the string is its template.
    Matched(String),
    /// The response has been built.
    Finalized,
}

/// Tracks one request from arrival to response.
#[derive(Debug)]
pub struct Exchange {
    request_id: String,
    method: Method,
    path: String,
    phase: Phase,
    started: Instant,
}

impl Exchange {
    /// Start tracking a request.
    pub fn enter<B>(request: &Request<B>) -> Self {
        Self {
            request_id: request_id(request).unwrap_or("unknown").to_string(),
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            phase: Phase::Unmatched,
            started: Instant::now(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Record that `pattern` consumed the request.
    pub fn mark_matched(&mut self, pattern: &Pattern) {
        debug_assert_eq!(self.phase, Phase::Unmatched);
        tracing::debug!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            route = %pattern,
            "Route matched"
        );
        self.phase = Phase::Matched(pattern.to_string());
    }

    /// Build the response for `outcome` and close the exchange.
    pub fn finish(mut self, outcome: Result<Reply, ApiError>) -> Response {
        let response = render(outcome);
        let status = response.status();

        let route = match &self.phase {
            Phase::Matched(route) => route.as_str(),
            _ => UNMATCHED_ROUTE,
        };
        metrics::record_request(self.method.as_str(), status.as_u16(), route, self.started);
        tracing::info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            route,
            status = status.as_u16(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Request completed"
        );

        self.phase = Phase::Finalized;
        response
    }
}

impl Drop for Exchange {
    fn drop(&mut self) {
        if self.phase != Phase::Finalized {
            tracing::warn!(
                request_id = %self.request_id,
                method = %self.method,
                path = %self.path,
                phase = ?self.phase,
                "Request abandoned before a response was built"
            );
            metrics::record_abandoned_exchange(self.method.as_str());
        }
    }
}
