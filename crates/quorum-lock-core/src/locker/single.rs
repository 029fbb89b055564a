//! Locker over exactly one store.

use std::sync::Arc;
use std::time::Duration;

use tracing::field::Empty;
use tracing::{Span, debug, instrument, warn};

use super::Locker;
use super::attempt::{AttemptOutcome, LockerContext, check_ttl};
use super::fanout::{set_bound, within};
use super::store_set::validate_stores;
use crate::error::{AttemptFailure, LockError, LockResult};
use crate::lock::{Lock, LockOptions};
use crate::observer::LockObserver;
use crate::store::LockStore;
use crate::timing::{Clock, Sleeper, Stopwatch};
use crate::token::TokenGenerator;

/// Builder for [`SingleStoreLocker`].
pub struct SingleStoreLockerBuilder<S> {
    store: S,
    store_timeout: Option<Duration>,
    context: LockerContext,
}

impl<S: LockStore> SingleStoreLockerBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            store_timeout: None,
            context: LockerContext::default(),
        }
    }

    /// Upper bound for each store call. `set` is also bounded by the TTL.
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn token_generator(mut self, generator: impl TokenGenerator + 'static) -> Self {
        self.context.token_generator = Arc::new(generator);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.context.clock = Arc::new(clock);
        self
    }

    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.context.sleeper = Arc::new(sleeper);
        self
    }

    pub fn observer(mut self, observer: impl LockObserver + 'static) -> Self {
        self.context.observer = Arc::new(observer);
        self
    }

    pub fn build(self) -> LockResult<SingleStoreLocker<S>> {
        validate_stores(std::slice::from_ref(&self.store))?;
        Ok(SingleStoreLocker {
            store: self.store,
            store_timeout: self.store_timeout,
            context: self.context,
        })
    }
}

/// Locker for a single backing store; no quorum involved.
pub struct SingleStoreLocker<S> {
    store: S,
    store_timeout: Option<Duration>,
    context: LockerContext,
}

impl<S: LockStore> SingleStoreLocker<S> {
    /// Creates a locker with default collaborators.
    pub fn new(store: S) -> LockResult<Self> {
        Self::builder(store).build()
    }

    pub fn builder(store: S) -> SingleStoreLockerBuilder<S> {
        SingleStoreLockerBuilder::new(store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn attempt(&self, lock: Lock, ttl: Option<Duration>) -> AttemptOutcome {
        let stopwatch = Stopwatch::start(self.context.clock.as_ref());
        let bound = set_bound(self.store_timeout, ttl);
        let set = within(bound, self.store.set(&lock, ttl)).await;
        let measurement = stopwatch.stop();
        Span::current().record("elapsed_ms", measurement.elapsed.as_millis() as u64);

        match set {
            Ok(true) => {}
            // Someone else's entry; leave it alone.
            Ok(false) => return Ok(Err(AttemptFailure::StoreRejected)),
            Err(e) => {
                // The write may have landed before the call failed.
                debug!(error = %e, "lock store did not answer the set");
                self.reset(&lock).await;
                return Ok(Err(AttemptFailure::StoreRejected));
            }
        }
        let Some(ttl) = ttl else {
            return Ok(Ok(lock.validated(None)));
        };

        match check_ttl(&measurement, ttl, self.store.drift(Some(ttl))) {
            Ok(validity_end_time) => Ok(Ok(lock.validated(Some(validity_end_time)))),
            Err(failure) => {
                // The entry is ours; drop it so the next attempt is not refused.
                self.reset(&lock).await;
                Ok(Err(failure))
            }
        }
    }

    /// Best-effort delete of `lock`.
    async fn reset(&self, lock: &Lock) {
        if let Err(e) = within(self.store_timeout, self.store.delete(lock)).await {
            debug!(error = %e, "reset failed on lock store");
        }
    }
}

impl<S: LockStore> Locker for SingleStoreLocker<S> {
    #[instrument(skip(self, options), fields(resource = %resource, locker = "single_store", ttl = ?options.ttl(), acquired = Empty, attempts = Empty, elapsed_ms = Empty))]
    async fn lock(&self, resource: &str, options: LockOptions) -> LockResult<Lock> {
        let ttl = options.ttl();
        self.context
            .acquire(resource, &options, |lock| self.attempt(lock, ttl))
            .await
    }

    #[instrument(skip(self), fields(locker = "single_store"))]
    async fn is_locked(&self, resource: &str) -> LockResult<bool> {
        within(self.store_timeout, self.store.exists(resource)).await
    }

    #[instrument(skip(self, lock), fields(resource = %lock.resource(), locker = "single_store"))]
    async fn unlock(&self, lock: &Lock) -> LockResult<()> {
        let deleted = within(self.store_timeout, self.store.delete(lock))
            .await
            .unwrap_or_else(|e| {
                debug!(error = %e, "lock store did not answer the delete");
                false
            });
        if deleted {
            return Ok(());
        }

        match within(self.store_timeout, self.store.exists(lock.resource())).await {
            Ok(false) => Ok(()),
            held => {
                warn!(resource = lock.resource(), still_held = ?held, "failed releasing the lock");
                Err(LockError::Unlocking {
                    resource: lock.resource().to_string(),
                    failed_stores: 1,
                })
            }
        }
    }
}
