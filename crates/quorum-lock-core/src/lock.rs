//! The lock value object and per-call lock options.

use std::time::Duration;

/// One acquisition of a named resource.
///
/// `resource` and `token` never change once the lock is created. The
/// validity deadline is written once by the locker, and only when a TTL was
/// requested and the acquisition was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lock {
    resource: String,
    token: String,
    validity_end_time: Option<u64>,
}

impl Lock {
    /// Creates a lock that has not been validated yet.
    pub fn new(resource: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            token: token.into(),
            validity_end_time: None,
        }
    }

    /// Name of the protected resource.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Ownership token of this acquisition.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Milliseconds since the Unix epoch after which the lock must be
    /// considered expired. `None` when no TTL was used.
    pub fn validity_end_time(&self) -> Option<u64> {
        self.validity_end_time
    }

    /// Time left before the validity deadline, measured against `now_millis`.
    ///
    /// Returns `None` for locks without a TTL and `Some(ZERO)` once expired.
    pub fn remaining_validity(&self, now_millis: u64) -> Option<Duration> {
        self.validity_end_time
            .map(|end| Duration::from_millis(end.saturating_sub(now_millis)))
    }

    pub(crate) fn validated(mut self, validity_end_time: Option<u64>) -> Self {
        debug_assert!(self.validity_end_time.is_none());
        self.validity_end_time = validity_end_time;
        self
    }
}

/// Options for a single `lock` call.
///
/// ```rust
/// use quorum_lock_core::LockOptions;
/// use std::time::Duration;
///
/// let options = LockOptions::new()
///     .with_ttl(Duration::from_millis(500))
///     .with_retry(3, Duration::from_millis(50));
/// assert_eq!(options.max_attempts(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOptions {
    ttl: Option<Duration>,
    retry_count: u32,
    retry_delay: Duration,
}

impl LockOptions {
    /// No TTL, no retries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how long stores keep the lock. A zero TTL means no expiry.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Sets the pause between two attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets both retry count and delay.
    pub fn with_retry(self, retry_count: u32, retry_delay: Duration) -> Self {
        self.with_retry_count(retry_count)
            .with_retry_delay(retry_delay)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Total number of attempts, first try included.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }
}
