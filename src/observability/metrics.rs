//! Metrics collection and exposition.
//!
//! # Metrics
//! - `model_requests_total` (counter): requests by method, route, status
//! - `model_request_duration_seconds` (histogram): latency distribution
//! - `model_store_records` (gauge): records currently stored
//! - `model_exchanges_abandoned_total` (counter): requests dropped before a response was built
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is opt-in via config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    metrics::counter!(
        "model_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "model_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the current number of stored records.
pub fn record_store_size(records: usize) {
    metrics::gauge!("model_store_records").set(records as f64);
}

/// Record a request whose response was never finalized.
pub fn record_abandoned_exchange(method: &str) {
    metrics::counter!("model_exchanges_abandoned_total", "method" => method.to_string()).increment(1);
}
