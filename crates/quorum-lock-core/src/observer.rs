//! Hook invoked whenever a lock attempt fails.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::info;

use crate::error::AttemptFailure;

/// Details of one rejected attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub resource: String,
    /// 1-based attempt number within a single `lock` call.
    pub attempt: u32,
    pub failure: AttemptFailure,
}

/// Observer notified after each failed attempt, once its reset went out.
///
/// The protocol does not depend on what the observer does.
pub trait LockObserver: Send + Sync + Debug {
    fn on_failed_attempt(&self, attempt: &FailedAttempt);
}

impl<T: LockObserver + ?Sized> LockObserver for Arc<T> {
    fn on_failed_attempt(&self, attempt: &FailedAttempt) {
        (**self).on_failed_attempt(attempt)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LockObserver for NoopObserver {
    fn on_failed_attempt(&self, _attempt: &FailedAttempt) {}
}

/// Reports failed attempts as `info` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LockObserver for TracingObserver {
    fn on_failed_attempt(&self, attempt: &FailedAttempt) {
        info!(
            resource = %attempt.resource,
            attempt = attempt.attempt,
            reason = %attempt.failure,
            "lock attempt failed"
        );
    }
}
