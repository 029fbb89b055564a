//! Wall clock, monotonic measurement and retry sleeps.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::future::{self, BoxFuture, FutureExt};
use tokio::time::Instant;

/// Source of wall-clock time, used to stamp a lock's validity deadline.
pub trait Clock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since_epoch| u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicU64,
}

impl FixedClock {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Times one locking attempt.
///
/// The origin is taken from the wall clock, the duration from tokio's
/// monotonic clock.
#[derive(Debug)]
pub struct Stopwatch {
    origin_millis: u64,
    started: Instant,
}

impl Stopwatch {
    pub fn start(clock: &dyn Clock) -> Self {
        Self {
            origin_millis: clock.now_millis(),
            started: Instant::now(),
        }
    }

    pub fn stop(self) -> Measurement {
        Measurement {
            origin_millis: self.origin_millis,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Outcome of a [`Stopwatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub origin_millis: u64,
    pub elapsed: Duration,
}

impl Measurement {
    /// Wall-clock deadline for a lock taken with `ttl` during this attempt.
    pub fn deadline(&self, ttl: Duration) -> u64 {
        let ttl = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self.origin_millis.saturating_add(ttl)
    }
}

/// Waits between two lock attempts.
pub trait Sleeper: Send + Sync + Debug {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        (**self).sleep(duration)
    }
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        if duration.is_zero() {
            return future::ready(()).boxed();
        }
        tokio::time::sleep(duration).boxed()
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSleeper;

impl Sleeper for NoopSleeper {
    fn sleep(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        future::ready(()).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stopwatch_measures_on_the_tokio_clock() {
        let clock = FixedClock::new(333);
        let stopwatch = Stopwatch::start(&clock);
        tokio::time::sleep(Duration::from_millis(40)).await;
        let measurement = stopwatch.stop();

        assert_eq!(measurement.origin_millis, 333);
        assert_eq!(measurement.elapsed, Duration::from_millis(40));
        assert_eq!(measurement.deadline(Duration::from_millis(100)), 433);
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(10);
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now_millis(), 15);
        clock.set(1);
        assert_eq!(clock.now_millis(), 1);
    }
}
