//! Metrics collection and exposition.
//!
//! # Metrics
//! - `compliment_requests_total` (counter): generation requests by outcome
//! - `compliment_frames_forwarded_total` (counter): outbound data frames
//! - `compliment_stream_duration_seconds` (histogram): relay lifetime by outcome
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

/// Count a generation request by how it was answered before streaming.
pub fn record_request(outcome: &'static str) {
    metrics::counter!("compliment_requests_total", "outcome" => outcome).increment(1);
}

/// Count one forwarded data frame.
pub fn record_frame() {
    metrics::counter!("compliment_frames_forwarded_total").increment(1);
}

/// Record how long a relay ran and how it ended.
pub fn record_stream(outcome: &'static str, started: Instant) {
    metrics::histogram!("compliment_stream_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}
