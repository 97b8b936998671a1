//! Embeddable health endpoint.
//!
//! Aggregates any number of dependency checkers behind one `Check` call and
//! serves it over gRPC (`healthz.v1.HealthService`) and an HTTP gateway
//! (`/v1/check`, `/v1/ping`).
//!
//! ```no_run
//! use healthz::{checker_fn, Healthz};
//!
//! # async fn run() -> Result<(), healthz::HealthzError> {
//! let healthz = Healthz::builder()
//!     .with_checker(checker_fn("database", |_cancel| async { true }))
//!     .start()
//!     .await?;
//!
//! // ... serve traffic ...
//!
//! healthz.shutdown().await
//! # }
//! ```

// Core
pub mod health;

// Transports
pub mod grpc;
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::HealthzConfig;
pub use health::{checker_fn, Aggregator, CheckReport, Checker, Failure, HealthError};
pub use lifecycle::{Healthz, HealthzBuilder, HealthzError, RpcTransport, Shutdown};
