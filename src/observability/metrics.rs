//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define health endpoint metrics (checks, probe outcomes, latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `healthz_checks_total` (counter): aggregate checks by status
//! - `healthz_check_duration_seconds` (histogram): aggregate check latency
//! - `healthz_probe_outcomes_total` (counter): probes by checker, outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Exporter installation is left to the binary

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished aggregate check.
pub fn record_check(serving: bool, start: Instant) {
    let status = if serving { "serving" } else { "not_serving" };
    metrics::counter!("healthz_checks_total", "status" => status).increment(1);
    metrics::histogram!("healthz_check_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an aggregate check abandoned by its caller.
pub fn record_cancelled_check(start: Instant) {
    metrics::counter!("healthz_checks_total", "status" => "cancelled").increment(1);
    metrics::histogram!("healthz_check_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record how a single probe was decided.
pub fn record_probe(checker: &str, outcome: &'static str) {
    metrics::counter!(
        "healthz_probe_outcomes_total",
        "checker" => checker.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
