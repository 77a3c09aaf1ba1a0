//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by method, status
//! - `relay_request_duration_seconds` (histogram): inbound latency
//! - `relay_upstream_calls_total` (counter): provider calls by action, outcome
//! - `relay_upstream_duration_seconds` (histogram): provider latency by action
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these unconditionally.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one provider call; `outcome` is `ok` or an error kind.
pub fn record_upstream_call(action: &'static str, outcome: &'static str, start: Instant) {
    counter!("relay_upstream_calls_total", "action" => action, "outcome" => outcome).increment(1);
    histogram!("relay_upstream_duration_seconds", "action" => action)
        .record(start.elapsed().as_secs_f64());
}
