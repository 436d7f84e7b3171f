//! Request metrics.
//!
//! # Metrics
//! - `mirror_requests_total` (counter): requests by method, status, branch
//! - `mirror_request_duration_seconds` (histogram): latency by branch
//!
//! `branch` is one of `static`, `proxy`, `forbidden`. Recording is always
//! on; the Prometheus endpoint only exists when an address is configured.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Must run inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, branch: &'static str, start: Instant) {
    ::metrics::counter!(
        "mirror_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "branch" => branch
    )
    .increment(1);

    ::metrics::histogram!("mirror_request_duration_seconds", "branch" => branch)
        .record(start.elapsed().as_secs_f64());
}
