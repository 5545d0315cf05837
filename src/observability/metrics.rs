//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `location_captures_total` (counter): records appended
//! - `location_capture_rejections_total` (counter): invalid captures by reason
//! - `location_storage_errors_total` (counter): failed log reads/writes by op
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus
//! recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_capture() {
    counter!("location_captures_total").increment(1);
}

pub fn record_capture_rejected(reason: &'static str) {
    counter!("location_capture_rejections_total", "reason" => reason).increment(1);
}

pub fn record_storage_error(op: &'static str) {
    counter!("location_storage_errors_total", "op" => op).increment(1);
}
