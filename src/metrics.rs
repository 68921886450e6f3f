//! Prometheus metrics for the kill switch.
//!
//! This module provides:
//! - Request counters for status checks, toggles and rejected keys
//! - Store error counter and store latency histogram
//! - HTTP request latency per endpoint
//! - Recorder installation for the `/metrics` endpoint

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Status checks counter metric name.
pub const METRIC_STATUS_CHECKS: &str = "status_checks_total";
/// Successful toggles counter metric name.
pub const METRIC_STATUS_TOGGLES: &str = "status_toggles_total";
/// Toggles rejected for a bad API key.
pub const METRIC_TOGGLE_REJECTIONS: &str = "toggle_rejections_total";
/// Store failures counter metric name.
pub const METRIC_STORE_ERRORS: &str = "store_errors_total";
/// Store operation latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_latency_ms";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Install the Prometheus recorder and describe all metrics.
/// Call this once at startup; the handle renders the `/metrics` body.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Register metric descriptions with the installed recorder.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Status store operation latency in milliseconds"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_STATUS_CHECKS, "Total number of status checks");
    describe_counter!(METRIC_STATUS_TOGGLES, "Total number of successful toggles");
    describe_counter!(
        METRIC_TOGGLE_REJECTIONS,
        "Total number of toggles rejected for an invalid API key"
    );
    describe_counter!(METRIC_STORE_ERRORS, "Total number of failed store operations");

    debug!("Metrics initialized");
}

/// Record store operation latency.
pub fn record_store_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_STORE_LATENCY).record(latency_ms);
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// Increment status checks counter.
pub fn inc_status_checks() {
    counter!(METRIC_STATUS_CHECKS).increment(1);
}

/// Increment toggles counter.
pub fn inc_status_toggles() {
    counter!(METRIC_STATUS_TOGGLES).increment(1);
}

/// Increment rejected toggles counter.
pub fn inc_toggle_rejections() {
    counter!(METRIC_TOGGLE_REJECTIONS).increment(1);
}

/// Increment store errors counter.
pub fn record_store_error() {
    counter!(METRIC_STORE_ERRORS).increment(1);
}
