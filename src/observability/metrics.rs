//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dservice_discovery_total` (counter): discovery runs by result
//! - `dservice_endpoints` (gauge): size of the finalized endpoint set
//! - `dservice_fetch_attempts_total` (counter): endpoint attempts by outcome
//! - `dservice_fetch_duration_seconds` (histogram): whole `fetch()` latency
//!
//! Recording is a no-op until a recorder is installed, so library users who
//! never call `init_metrics` pay nothing.

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_discovery(result: &'static str) {
    counter!("dservice_discovery_total", "result" => result).increment(1);
}

pub fn record_endpoint_count(count: usize) {
    gauge!("dservice_endpoints").set(count as f64);
}

pub fn record_attempt(outcome: &'static str) {
    counter!("dservice_fetch_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_duration(seconds: f64) {
    histogram!("dservice_fetch_duration_seconds").record(seconds);
}
