//! Logs and metrics for the health endpoint.
//!
//! # Data Flow
//! ```text
//! probe.rs      → per-checker outcome (healthy / unhealthy / timeout)
//! aggregator.rs → per-request verdict and latency
//! http/server   → request spans tagged with x-request-id
//!     → logging.rs (tracing subscriber: pretty or JSON on stdout)
//!     → metrics.rs (Prometheus exporter, opt-in)
//! ```
//!
//! # Design Decisions
//! - Both sinks are installed by the binary; an embedding host keeps its own
//! - Without an installed recorder the metrics macros are no-ops

pub mod logging;
pub mod metrics;
