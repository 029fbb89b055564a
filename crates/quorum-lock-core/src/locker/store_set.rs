//! Quorum-judged fan-out over several stores.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Span, debug, warn};

use super::attempt::{AttemptOutcome, check_ttl};
use super::fanout::{count_accepted, delete_on_all, exists_on_all, set_bound, set_on_all};
use crate::drift::DriftAggregation;
use crate::error::{AttemptFailure, LockError, LockResult};
use crate::lock::Lock;
use crate::quorum::Quorum;
use crate::store::LockStore;
use crate::timing::{Clock, Stopwatch};

/// Rejects an empty store list and stores that are not ready.
pub(crate) fn validate_stores<S: LockStore>(stores: &[S]) -> LockResult<()> {
    if stores.is_empty() {
        return Err(LockError::InvalidConfiguration(
            "at least one lock store is required".to_string(),
        ));
    }
    if let Some(position) = stores.iter().position(|store| !store.is_ready()) {
        return Err(LockError::InvalidConfiguration(format!(
            "lock store #{position} is not ready"
        )));
    }
    Ok(())
}

/// The stores of a multi-store locker together with the policies judging them.
pub(crate) struct StoreSet<S> {
    stores: Vec<Arc<S>>,
    quorum: Box<dyn Quorum>,
    drift_aggregation: DriftAggregation,
    store_timeout: Option<Duration>,
}

impl<S: LockStore> StoreSet<S> {
    /// Validates the stores and initializes the quorum with their count.
    pub(crate) fn new(
        stores: Vec<S>,
        mut quorum: Box<dyn Quorum>,
        drift_aggregation: DriftAggregation,
        store_timeout: Option<Duration>,
    ) -> LockResult<Self> {
        validate_stores(&stores)?;
        quorum.init(stores.len())?;

        Ok(Self {
            stores: stores.into_iter().map(Arc::new).collect(),
            quorum,
            drift_aggregation,
            store_timeout,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.stores.len()
    }

    pub(crate) fn drift(&self, ttl: Option<Duration>) -> Duration {
        self.drift_aggregation
            .aggregate(self.stores.iter().map(|store| store.drift(ttl)))
    }

    /// Sets `lock` on every store, then judges quorum and TTL.
    ///
    /// A rejected attempt is reset on every store before returning.
    pub(crate) async fn attempt(
        &self,
        clock: &dyn Clock,
        lock: Lock,
        ttl: Option<Duration>,
    ) -> AttemptOutcome {
        let stopwatch = Stopwatch::start(clock);
        let bound = set_bound(self.store_timeout, ttl);
        let results = set_on_all(&self.stores, &lock, ttl, bound).await;
        let measurement = stopwatch.stop();

        for (position, result) in results.iter().enumerate() {
            if let Err(e) = result {
                debug!(store = position, error = %e, "lock store did not answer the set");
            }
        }
        let successes = count_accepted(&results);
        Span::current().record("stores_acquired", successes);
        Span::current().record("elapsed_ms", measurement.elapsed.as_millis() as u64);

        let met = match self.quorum.is_met(successes) {
            Ok(met) => met,
            Err(e) => {
                self.reset(&lock).await;
                return Err(e.into());
            }
        };
        let verdict = if !met {
            Err(AttemptFailure::QuorumNotMet {
                successes,
                total: self.stores.len(),
            })
        } else if let Some(ttl) = ttl {
            check_ttl(&measurement, ttl, self.drift(Some(ttl))).map(Some)
        } else {
            Ok(None)
        };

        match verdict {
            Ok(validity_end_time) => Ok(Ok(lock.validated(validity_end_time))),
            Err(failure) => {
                self.reset(&lock).await;
                Ok(Err(failure))
            }
        }
    }

    /// Best-effort delete of `lock` on every store.
    async fn reset(&self, lock: &Lock) {
        let results = delete_on_all(&self.stores, lock, self.store_timeout).await;
        for (position, result) in results.iter().enumerate() {
            if let Err(e) = result {
                debug!(store = position, error = %e, "reset failed on lock store");
            }
        }
    }

    /// True as soon as one store reports the resource.
    ///
    /// Store errors only surface when no store reported the resource.
    pub(crate) async fn is_locked(&self, resource: &str) -> LockResult<bool> {
        let mut first_error = None;
        for result in exists_on_all(&self.stores, resource, self.store_timeout).await {
            match result {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(false), Err)
    }

    /// Deletes on every store, then checks the stores that did not delete.
    pub(crate) async fn unlock(&self, lock: &Lock) -> LockResult<()> {
        let deletes = delete_on_all(&self.stores, lock, self.store_timeout).await;
        let undeleted: Vec<Arc<S>> = self
            .stores
            .iter()
            .zip(&deletes)
            .filter(|(_, deleted)| !matches!(deleted, Ok(true)))
            .map(|(store, _)| store.clone())
            .collect();
        if undeleted.is_empty() {
            return Ok(());
        }

        let still_held = exists_on_all(&undeleted, lock.resource(), self.store_timeout)
            .await
            .iter()
            .filter(|exists| !matches!(exists, Ok(false)))
            .count();
        if still_held == 0 {
            debug!(
                resource = lock.resource(),
                stores = undeleted.len(),
                "lock already released on some stores"
            );
            return Ok(());
        }

        warn!(
            resource = lock.resource(),
            failed_stores = still_held,
            "failed releasing the lock"
        );
        Err(LockError::Unlocking {
            resource: lock.resource().to_string(),
            failed_stores: still_held,
        })
    }
}
