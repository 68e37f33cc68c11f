//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_resolutions_total` (counter): resolutions by source (cache, pattern, path)
//! - `route_unmatched_total` (counter): requests no strategy could route
//! - `route_reloads_total` (counter): config reloads by outcome
//! - `route_cache_entries` (gauge): size of the active route cache

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(source: &'static str) {
    counter!("route_resolutions_total", "source" => source).increment(1);
}

pub fn record_unmatched() {
    counter!("route_unmatched_total").increment(1);
}

pub fn record_reload(outcome: &'static str) {
    counter!("route_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_size(size: usize) {
    gauge!("route_cache_entries").set(size as f64);
}
