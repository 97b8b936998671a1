//! Checker abstraction.
//!
//! # Responsibilities
//! - Define the capability every dependency check implements
//! - Adapt plain async closures into checkers
//!
//! # Design Decisions
//! - A checker answers with a bare `bool`; failures are not errors
//! - Checkers receive a cancellation token but are free to ignore it
//! - A checker that stops on cancellation reports no verdict, so the probe
//!   cache keeps the last answer actually observed
//! - Names exist only for failure attribution

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A dependency that can report whether it is healthy.
#[async_trait]
pub trait Checker: Send + Sync + 'static {
    /// Evaluate the dependency.
    ///
    /// `cancel` fires when the probe deadline passes or the enclosing check
    /// request goes away.
    async fn check(&self, cancel: CancellationToken) -> bool;

    /// Evaluate the dependency, or give up without a verdict.
    ///
    /// The probe calls this and caches only `Some` answers. Checkers that
    /// abandon their work when `cancel` fires override it to return `None`
    /// in that case; the default reports whatever [`Checker::check`] returns.
    async fn try_check(&self, cancel: CancellationToken) -> Option<bool> {
        Some(self.check(cancel).await)
    }

    /// Human-readable label used when this checker fails.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

#[async_trait]
impl<C: Checker + ?Sized> Checker for Arc<C> {
    async fn check(&self, cancel: CancellationToken) -> bool {
        (**self).check(cancel).await
    }

    async fn try_check(&self, cancel: CancellationToken) -> Option<bool> {
        (**self).try_check(cancel).await
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

#[async_trait]
impl<C: Checker + ?Sized> Checker for Box<C> {
    async fn check(&self, cancel: CancellationToken) -> bool {
        (**self).check(cancel).await
    }

    async fn try_check(&self, cancel: CancellationToken) -> Option<bool> {
        (**self).try_check(cancel).await
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Checker backed by an async closure. Built with [`checker_fn`].
pub struct FnChecker<F> {
    name: String,
    f: F,
}

/// Wrap an async closure as a [`Checker`].
///
/// ```
/// use healthz::health::checker_fn;
///
/// let always_up = checker_fn("always-up", |_cancel| async { true });
/// ```
pub fn checker_fn<F, Fut>(name: impl Into<String>, f: F) -> FnChecker<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    FnChecker {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<F, Fut> Checker for FnChecker<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn check(&self, cancel: CancellationToken) -> bool {
        (self.f)(cancel).await
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

impl<F> std::fmt::Debug for FnChecker<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnChecker").field("name", &self.name).finish()
    }
}
