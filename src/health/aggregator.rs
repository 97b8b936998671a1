//! Fan-out of one check request across every registered checker.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::health::checker::Checker;
use crate::health::probe::{Probe, DEFAULT_PROBE_TIMEOUT};
use crate::observability::metrics;

/// Error type for aggregate checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HealthError {
    /// The caller went away before all probes finished.
    #[error("health check request canceled")]
    Cancelled,
    /// Continuous health subscriptions are not offered.
    #[error("watching health status is not supported")]
    WatchUnsupported,
}

/// The first checker found unhealthy during a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Registration order of the failing checker.
    pub index: usize,
    /// Label of the failing checker.
    pub checker: String,
    /// Explanation suitable for callers.
    pub message: String,
}

impl Failure {
    fn new(index: usize, checker: &str) -> Self {
        Self {
            index,
            checker: checker.to_string(),
            message: format!("unsuccessful health check for dependency {}", checker),
        }
    }
}

/// Verdict of one check request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckReport {
    Serving,
    NotServing(Failure),
}

impl CheckReport {
    pub fn is_serving(&self) -> bool {
        matches!(self, CheckReport::Serving)
    }
}

/// Combines the probes of all registered checkers into one verdict.
///
/// The probe list is fixed at construction. `check` takes `&self` and may be
/// called from any number of requests at once; the only shared mutable state
/// is each probe's cached result.
#[derive(Debug, Default)]
pub struct Aggregator {
    probes: Vec<Arc<Probe>>,
}

impl Aggregator {
    /// Register checkers with the default probe deadline.
    pub fn new(checkers: Vec<Arc<dyn Checker>>) -> Self {
        Self::with_timeout(checkers, DEFAULT_PROBE_TIMEOUT)
    }

    /// Register checkers with a custom probe deadline.
    pub fn with_timeout(checkers: Vec<Arc<dyn Checker>>, timeout: Duration) -> Self {
        let probes = checkers
            .into_iter()
            .map(|checker| Arc::new(Probe::new(checker, timeout)))
            .collect();
        Self { probes }
    }

    pub fn probes(&self) -> &[Arc<Probe>] {
        &self.probes
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Probe every checker concurrently and combine the results.
    ///
    /// Returns at the first unhealthy probe, cancelling its siblings. Returns
    /// `HealthError::Cancelled` as soon as `request` is cancelled.
    pub async fn check(&self, request: &CancellationToken) -> Result<CheckReport, HealthError> {
        let start = Instant::now();
        // Siblings of this call only; other requests keep their own group.
        let group = request.child_token();
        let _guard = group.clone().drop_guard();

        let mut pending: FuturesUnordered<_> = self
            .probes
            .iter()
            .enumerate()
            .map(|(index, probe)| {
                let group = &group;
                async move { (index, probe.run(group).await) }
            })
            .collect();

        let result = loop {
            tokio::select! {
                biased;

                _ = request.cancelled() => {
                    tracing::debug!(pending = pending.len(), "Check request cancelled");
                    break Err(HealthError::Cancelled);
                }
                next = pending.next() => match next {
                    None => break Ok(CheckReport::Serving),
                    Some((_, outcome)) if outcome.is_healthy() => continue,
                    Some((index, _)) => {
                        let failure = Failure::new(index, self.probes[index].name());
                        tracing::warn!(
                            checker = %failure.checker,
                            index,
                            "Dependency reported unhealthy"
                        );
                        break Ok(CheckReport::NotServing(failure));
                    }
                },
            }
        };

        // Remaining probes resolve at once with their cached results; the
        // checkers themselves keep running.
        group.cancel();
        while pending.next().await.is_some() {}

        match &result {
            Ok(report) => metrics::record_check(report.is_serving(), start),
            Err(_) => metrics::record_cancelled_check(start),
        }
        result
    }

    /// Continuous status subscriptions are not offered.
    pub fn watch(&self) -> Result<Infallible, HealthError> {
        Err(HealthError::WatchUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::checker::checker_fn;

    fn fixed(name: &'static str, healthy: bool) -> Arc<dyn Checker> {
        Arc::new(checker_fn(name, move |_| async move { healthy }))
    }

    #[tokio::test]
    async fn no_checkers_is_serving() {
        let aggregator = Aggregator::default();
        let report = aggregator.check(&CancellationToken::new()).await;
        assert_eq!(report, Ok(CheckReport::Serving));
    }

    #[tokio::test]
    async fn all_healthy_is_serving() {
        let aggregator = Aggregator::new(vec![fixed("db", true), fixed("queue", true)]);
        let report = aggregator.check(&CancellationToken::new()).await;
        assert_eq!(report, Ok(CheckReport::Serving));
    }

    #[tokio::test]
    async fn failure_names_the_checker() {
        let aggregator = Aggregator::new(vec![fixed("db", true), fixed("queue", false)]);
        match aggregator.check(&CancellationToken::new()).await {
            Ok(CheckReport::NotServing(failure)) => {
                assert_eq!(failure.index, 1);
                assert_eq!(failure.checker, "queue");
                assert!(failure.message.contains("queue"));
            }
            other => panic!("expected not serving, got {:?}", other),
        }
    }

    #[test]
    fn watch_is_unsupported() {
        match Aggregator::default().watch() {
            Ok(never) => match never {},
            Err(e) => assert_eq!(e, HealthError::WatchUnsupported),
        }
    }
}
