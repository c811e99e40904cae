//! Metrics collection and exposition.
//!
//! # Metrics
//! - `optiserve_proxy_requests_total` (counter): by method, status, upstream
//! - `optiserve_proxy_request_duration_seconds` (histogram): by upstream

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start a Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one proxied request.
pub fn record_request(method: &str, status: u16, upstream: &str, start_time: Instant) {
    let elapsed = start_time.elapsed().as_secs_f64();

    metrics::counter!(
        "optiserve_proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "upstream" => upstream.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "optiserve_proxy_request_duration_seconds",
        "upstream" => upstream.to_string()
    )
    .record(elapsed);
}
