//! Dependency health aggregation.
//!
//! # Data Flow
//! ```text
//! Check request (cancellation token)
//!     → aggregator.rs (one probe per registered checker, concurrently)
//!     → probe.rs (checker raced against its deadline, result cached)
//!     → checker.rs (user-supplied dependency check)
//!     → first unhealthy probe cancels its siblings
//!     → CheckReport (serving / not serving + failing checker)
//!
//! Ping request
//!     → liveness.rs (always alive, no checker involved)
//! ```
//!
//! # Design Decisions
//! - Probes run only inside a check request; nothing polls in the background
//! - Only the latest result per checker is kept
//! - A missed deadline serves the cached result; an empty cache is unhealthy
//! - Only observed verdicts are cached; an abandoned check leaves it alone

pub mod aggregator;
pub mod checker;
pub mod checkers;
pub mod liveness;
pub mod probe;

pub use aggregator::{Aggregator, CheckReport, Failure, HealthError};
pub use checker::{checker_fn, Checker, FnChecker};
pub use checkers::{HttpChecker, TcpChecker};
pub use liveness::{ping, Pong};
pub use probe::{Probe, ProbeOutcome, DEFAULT_PROBE_TIMEOUT};
