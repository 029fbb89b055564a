//! Retry loop shared by every locker variant.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Span, debug, warn};

use crate::error::{AttemptFailure, LockError, LockResult};
use crate::lock::{Lock, LockOptions};
use crate::observer::{FailedAttempt, LockObserver, NoopObserver};
use crate::timing::{Clock, Measurement, Sleeper, SystemClock, TokioSleeper};
use crate::token::{RandomTokenGenerator, TokenGenerator};

/// Outcome of one attempt: a validated lock, or the reason it was rejected.
///
/// The outer `Err` is reserved for failures that must not be retried.
pub(crate) type AttemptOutcome = LockResult<Result<Lock, AttemptFailure>>;

/// Collaborators every locker needs besides its stores.
#[derive(Clone)]
pub(crate) struct LockerContext {
    pub(crate) token_generator: Arc<dyn TokenGenerator>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
    pub(crate) observer: Arc<dyn LockObserver>,
}

impl Default for LockerContext {
    fn default() -> Self {
        Self {
            token_generator: Arc::new(RandomTokenGenerator),
            clock: Arc::new(SystemClock),
            sleeper: Arc::new(TokioSleeper),
            observer: Arc::new(NoopObserver),
        }
    }
}

impl LockerContext {
    /// Runs up to `options.max_attempts()` attempts, each with a fresh token.
    pub(crate) async fn acquire<F, Fut>(
        &self,
        resource: &str,
        options: &LockOptions,
        mut attempt: F,
    ) -> LockResult<Lock>
    where
        F: FnMut(Lock) -> Fut,
        Fut: Future<Output = AttemptOutcome>,
    {
        let max_attempts = options.max_attempts();
        let mut tried = 1;

        loop {
            let lock = Lock::new(resource, self.token_generator.generate_token());
            let failure = match attempt(lock).await? {
                Ok(lock) => {
                    Span::current().record("acquired", true);
                    Span::current().record("attempts", tried);
                    return Ok(lock);
                }
                Err(failure) => failure,
            };

            debug!(resource, attempt = tried, reason = %failure, "lock attempt failed");
            self.observer.on_failed_attempt(&FailedAttempt {
                resource: resource.to_string(),
                attempt: tried,
                failure: failure.clone(),
            });

            if tried >= max_attempts {
                Span::current().record("acquired", false);
                Span::current().record("attempts", tried);
                warn!(resource, attempts = tried, reason = %failure, "failed locking the resource");
                return Err(LockError::Locking {
                    resource: resource.to_string(),
                    attempts: tried,
                    last_failure: failure,
                });
            }

            self.sleeper.sleep(options.retry_delay()).await;
            tried += 1;
        }
    }
}

/// Validity deadline of an attempt, unless locking ate the whole TTL.
///
/// The attempt is rejected when `elapsed + drift >= ttl`.
pub(crate) fn check_ttl(
    measurement: &Measurement,
    ttl: Duration,
    drift: Duration,
) -> Result<u64, AttemptFailure> {
    if measurement.elapsed + drift >= ttl {
        return Err(AttemptFailure::TtlExceeded {
            elapsed: measurement.elapsed,
            drift,
            ttl,
        });
    }
    Ok(measurement.deadline(ttl))
}
