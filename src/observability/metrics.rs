//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portal_navigations_total` (counter): navigations by outcome
//! - `portal_navigation_duration_seconds` (histogram): resolve-to-commit latency
//! - `portal_fetches_total` (counter): middleware fetches by resource, result
//! - `portal_api_requests_total` (counter): backend calls by method, status
//! - `portal_api_request_duration_seconds` (histogram): backend call latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The library never installs a recorder; binaries opt in via [`init_metrics`]

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::state::Resource;

/// Install the Prometheus recorder with an HTTP scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_navigation(outcome: &'static str, duration: Duration) {
    ::metrics::counter!("portal_navigations_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("portal_navigation_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_fetch(resource: Resource, success: bool) {
    let result = if success { "ok" } else { "error" };
    ::metrics::counter!(
        "portal_fetches_total",
        "resource" => resource.as_str(),
        "result" => result
    )
    .increment(1);
}

pub fn record_api_request(method: &str, status: u16, duration: Duration) {
    ::metrics::counter!(
        "portal_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("portal_api_request_duration_seconds").record(duration.as_secs_f64());
}
