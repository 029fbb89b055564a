//! Locker over N stores judged by a quorum policy.

use std::sync::Arc;
use std::time::Duration;

use tracing::field::Empty;
use tracing::instrument;

use super::Locker;
use super::attempt::LockerContext;
use super::store_set::StoreSet;
use crate::drift::DriftAggregation;
use crate::error::LockResult;
use crate::lock::{Lock, LockOptions};
use crate::observer::LockObserver;
use crate::quorum::{MajorityQuorum, Quorum};
use crate::store::LockStore;
use crate::timing::{Clock, Sleeper};
use crate::token::TokenGenerator;

/// Builder for [`MultiStoreLocker`].
///
/// # Example
///
/// ```rust,ignore
/// let locker = MultiStoreLocker::builder()
///     .stores(redis_stores)
///     .quorum(MajorityQuorum::new())
///     .store_timeout(Duration::from_millis(50))
///     .build()?;
/// ```
pub struct MultiStoreLockerBuilder<S> {
    stores: Vec<S>,
    quorum: Box<dyn Quorum>,
    drift_aggregation: DriftAggregation,
    store_timeout: Option<Duration>,
    context: LockerContext,
}

impl<S: LockStore> MultiStoreLockerBuilder<S> {
    /// Creates a builder with a majority quorum and max-drift aggregation.
    pub fn new() -> Self {
        Self {
            stores: Vec::new(),
            quorum: Box::new(MajorityQuorum::new()),
            drift_aggregation: DriftAggregation::Max,
            store_timeout: None,
            context: LockerContext::default(),
        }
    }

    /// Adds a store.
    pub fn store(mut self, store: S) -> Self {
        self.stores.push(store);
        self
    }

    /// Adds several stores.
    pub fn stores(mut self, stores: impl IntoIterator<Item = S>) -> Self {
        self.stores.extend(stores);
        self
    }

    /// Sets the quorum policy. It is initialized with the store count on `build`.
    pub fn quorum(mut self, quorum: impl Quorum + 'static) -> Self {
        self.quorum = Box::new(quorum);
        self
    }

    pub fn drift_aggregation(mut self, aggregation: DriftAggregation) -> Self {
        self.drift_aggregation = aggregation;
        self
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

    /// Builds the locker.
    ///
    /// Fails with `LockError::InvalidConfiguration` when no store was given
    /// or a store is not ready.
    pub fn build(self) -> LockResult<MultiStoreLocker<S>> {
        Ok(MultiStoreLocker {
            stores: StoreSet::new(
                self.stores,
                self.quorum,
                self.drift_aggregation,
                self.store_timeout,
            )?,
            context: self.context,
        })
    }
}

impl<S: LockStore> Default for MultiStoreLockerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Locker fanning out to several independent stores.
///
/// An attempt succeeds when the quorum accepts the number of stores that set
/// the lock and, with a TTL, when the time spent locking plus the aggregated
/// drift leaves part of the TTL. Rejected attempts are reset on every store.
pub struct MultiStoreLocker<S> {
    stores: StoreSet<S>,
    context: LockerContext,
}

impl<S: LockStore> MultiStoreLocker<S> {
    /// Creates a majority-quorum locker with default collaborators.
    pub fn new(stores: impl IntoIterator<Item = S>) -> LockResult<Self> {
        Self::builder().stores(stores).build()
    }

    pub fn builder() -> MultiStoreLockerBuilder<S> {
        MultiStoreLockerBuilder::new()
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Drift budget applied to a lock taken with `ttl`.
    pub fn drift(&self, ttl: Option<Duration>) -> Duration {
        self.stores.drift(ttl)
    }
}

impl<S: LockStore> Locker for MultiStoreLocker<S> {
    #[instrument(skip(self, options), fields(resource = %resource, locker = "multi_store", stores = self.stores.len(), ttl = ?options.ttl(), acquired = Empty, attempts = Empty, stores_acquired = Empty, elapsed_ms = Empty))]
    async fn lock(&self, resource: &str, options: LockOptions) -> LockResult<Lock> {
        let ttl = options.ttl();
        let clock = self.context.clock.as_ref();
        self.context
            .acquire(resource, &options, |lock| self.stores.attempt(clock, lock, ttl))
            .await
    }

    #[instrument(skip(self), fields(locker = "multi_store", stores = self.stores.len()))]
    async fn is_locked(&self, resource: &str) -> LockResult<bool> {
        self.stores.is_locked(resource).await
    }

    #[instrument(skip(self, lock), fields(resource = %lock.resource(), locker = "multi_store", stores = self.stores.len()))]
    async fn unlock(&self, lock: &Lock) -> LockResult<()> {
        self.stores.unlock(lock).await
    }
}
