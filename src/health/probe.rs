//! Deadline-bounded probe of a single checker.
//!
//! # Responsibilities
//! - Own one checker together with its last observed result
//! - Run the checker under a per-probe deadline
//! - Fall back to the cached result when the deadline wins
//!
//! # Design Decisions
//! - The checker runs on its own detached task and is never aborted
//! - A late answer still lands in the cache, for the next probe to use
//! - A checker that gives up on cancellation leaves the cache untouched
//! - The cache starts out unhealthy (fail-closed)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::health::checker::Checker;
use crate::observability::metrics;

/// Deadline applied to each probe unless the registration overrides it.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// How a single probe was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The checker answered before the deadline.
    Completed(bool),
    /// The deadline fired first; carries the cached result.
    TimedOut(bool),
    /// The probe was cancelled, or the checker gave up without a verdict;
    /// carries the cached result.
    Cancelled(bool),
}

impl ProbeOutcome {
    /// Whether this probe counts as healthy.
    pub fn is_healthy(self) -> bool {
        match self {
            ProbeOutcome::Completed(healthy)
            | ProbeOutcome::TimedOut(healthy)
            | ProbeOutcome::Cancelled(healthy) => healthy,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ProbeOutcome::Completed(true) => "healthy",
            ProbeOutcome::Completed(false) => "unhealthy",
            ProbeOutcome::TimedOut(_) => "timeout",
            ProbeOutcome::Cancelled(_) => "cancelled",
        }
    }
}

/// A registered checker and its cached last result.
pub struct Probe {
    checker: Arc<dyn Checker>,
    name: String,
    last_result: Arc<AtomicBool>,
    timeout: Duration,
}

impl Probe {
    /// Register a checker with an empty (unhealthy) cache.
    pub fn new(checker: Arc<dyn Checker>, timeout: Duration) -> Self {
        let name = checker.name();
        Self {
            checker,
            name,
            last_result: Arc::new(AtomicBool::new(false)),
            timeout,
        }
    }

    /// Checker label used in failure messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-probe deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Most recent result stored by any probe of this checker.
    pub fn last_result(&self) -> bool {
        self.last_result.load(Ordering::Acquire)
    }

    /// Probe the checker once.
    ///
    /// Never waits past the deadline and never fails: if the checker has not
    /// answered in time, or `parent` is cancelled, the cached result is returned.
    pub async fn run(&self, parent: &CancellationToken) -> ProbeOutcome {
        let token = parent.child_token();
        // Cancels the derived token on every exit path, including when this
        // future is dropped by the aggregator.
        let _guard = token.clone().drop_guard();

        let checker = Arc::clone(&self.checker);
        let slot = Arc::clone(&self.last_result);
        let checker_token = token.clone();
        let mut task = tokio::spawn(async move {
            let verdict = checker.try_check(checker_token).await;
            if let Some(healthy) = verdict {
                slot.store(healthy, Ordering::Release);
            }
            verdict
        });

        let outcome = tokio::select! {
            joined = &mut task => match joined {
                Ok(Some(healthy)) => ProbeOutcome::Completed(healthy),
                Ok(None) => ProbeOutcome::Cancelled(self.last_result()),
                Err(e) => {
                    tracing::error!(checker = %self.name, error = %e, "Checker task failed");
                    self.last_result.store(false, Ordering::Release);
                    ProbeOutcome::Completed(false)
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                let cached = self.last_result();
                tracing::warn!(
                    checker = %self.name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    cached,
                    "Checker missed its deadline, serving cached result"
                );
                ProbeOutcome::TimedOut(cached)
            }
            _ = token.cancelled() => {
                let cached = self.last_result();
                tracing::debug!(checker = %self.name, cached, "Probe cancelled, serving cached result");
                ProbeOutcome::Cancelled(cached)
            }
        };

        metrics::record_probe(&self.name, outcome.label());
        outcome
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("name", &self.name)
            .field("last_result", &self.last_result())
            .field("timeout", &self.timeout)
            .finish()
    }
}
