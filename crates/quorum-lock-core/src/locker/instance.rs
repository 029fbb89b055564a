//! Locker over N stores that must all accept the lock.

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
use crate::quorum::UnanimousQuorum;
use crate::store::LockStore;
use crate::timing::{Clock, Sleeper};
use crate::token::TokenGenerator;

/// Builder for [`MultiInstanceLocker`].
pub struct MultiInstanceLockerBuilder<S> {
    stores: Vec<S>,
    drift_aggregation: DriftAggregation,
    store_timeout: Option<Duration>,
    context: LockerContext,
}

impl<S: LockStore> MultiInstanceLockerBuilder<S> {
    /// Creates a builder using the first store's drift.
    pub fn new() -> Self {
        Self {
            stores: Vec::new(),
            drift_aggregation: DriftAggregation::First,
            store_timeout: None,
            context: LockerContext::default(),
        }
    }

    pub fn store(mut self, store: S) -> Self {
        self.stores.push(store);
        self
    }

    pub fn stores(mut self, stores: impl IntoIterator<Item = S>) -> Self {
        self.stores.extend(stores);
        self
    }

    pub fn drift_aggregation(mut self, aggregation: DriftAggregation) -> Self {
        self.drift_aggregation = aggregation;
        self
    }

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

    pub fn build(self) -> LockResult<MultiInstanceLocker<S>> {
        Ok(MultiInstanceLocker {
            stores: StoreSet::new(
                self.stores,
                Box::new(UnanimousQuorum::new()),
                self.drift_aggregation,
                self.store_timeout,
            )?,
            context: self.context,
        })
    }
}

impl<S: LockStore> Default for MultiInstanceLockerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Locker for deployments where every store must hold the lock.
///
/// There is no quorum to configure: a single refusing store fails the
/// attempt, which is then reset everywhere.
pub struct MultiInstanceLocker<S> {
    stores: StoreSet<S>,
    context: LockerContext,
}

impl<S: LockStore> MultiInstanceLocker<S> {
    pub fn new(stores: impl IntoIterator<Item = S>) -> LockResult<Self> {
        Self::builder().stores(stores).build()
    }

    pub fn builder() -> MultiInstanceLockerBuilder<S> {
        MultiInstanceLockerBuilder::new()
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }
}

impl<S: LockStore> Locker for MultiInstanceLocker<S> {
    #[instrument(skip(self, options), fields(resource = %resource, locker = "multi_instance", stores = self.stores.len(), ttl = ?options.ttl(), acquired = Empty, attempts = Empty, stores_acquired = Empty, elapsed_ms = Empty))]
    async fn lock(&self, resource: &str, options: LockOptions) -> LockResult<Lock> {
        let ttl = options.ttl();
        let clock = self.context.clock.as_ref();
        self.context
            .acquire(resource, &options, |lock| self.stores.attempt(clock, lock, ttl))
            .await
    }

    #[instrument(skip(self), fields(locker = "multi_instance", stores = self.stores.len()))]
    async fn is_locked(&self, resource: &str) -> LockResult<bool> {
        self.stores.is_locked(resource).await
    }

    #[instrument(skip(self, lock), fields(resource = %lock.resource(), locker = "multi_instance", stores = self.stores.len()))]
    async fn unlock(&self, lock: &Lock) -> LockResult<()> {
        self.stores.unlock(lock).await
    }
}
