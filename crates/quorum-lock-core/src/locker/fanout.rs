//! Concurrent fan-out of one store operation to every store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::{LockError, LockResult};
use crate::lock::Lock;
use crate::store::LockStore;

/// Runs `call`, failing with [`LockError::Timeout`] once `bound` elapses.
pub(crate) async fn within<T>(
    bound: Option<Duration>,
    call: impl Future<Output = LockResult<T>>,
) -> LockResult<T> {
    match bound {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| LockError::Timeout(limit))?,
        None => call.await,
    }
}

/// Bound for a `set` call: the store timeout, never longer than the TTL.
pub(crate) fn set_bound(
    store_timeout: Option<Duration>,
    ttl: Option<Duration>,
) -> Option<Duration> {
    match (store_timeout, ttl) {
        (Some(timeout), Some(ttl)) => Some(timeout.min(ttl)),
        (timeout, None) => timeout,
        (None, ttl) => ttl,
    }
}

/// Spawns `op` once per store and waits for every task.
///
/// Results keep the order of `stores`. A panicked task is reported as a
/// backend error for its store.
async fn fan_out<S, F, Fut, T>(
    stores: &[Arc<S>],
    bound: Option<Duration>,
    op: F,
) -> Vec<LockResult<T>>
where
    S: LockStore,
    F: Fn(Arc<S>) -> Fut,
    Fut: Future<Output = LockResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let tasks: Vec<JoinHandle<LockResult<T>>> = stores
        .iter()
        .map(|store| {
            let call = op(store.clone());
            tokio::spawn(within(bound, call))
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        results.push(match task.await {
            Ok(result) => result,
            Err(join_error) => Err(LockError::Backend(Box::new(join_error))),
        });
    }
    results
}

pub(crate) async fn set_on_all<S: LockStore>(
    stores: &[Arc<S>],
    lock: &Lock,
    ttl: Option<Duration>,
    bound: Option<Duration>,
) -> Vec<LockResult<bool>> {
    fan_out(stores, bound, |store| {
        let lock = lock.clone();
        async move { store.set(&lock, ttl).await }
    })
    .await
}

pub(crate) async fn delete_on_all<S: LockStore>(
    stores: &[Arc<S>],
    lock: &Lock,
    bound: Option<Duration>,
) -> Vec<LockResult<bool>> {
    fan_out(stores, bound, |store| {
        let lock = lock.clone();
        async move { store.delete(&lock).await }
    })
    .await
}

pub(crate) async fn exists_on_all<S: LockStore>(
    stores: &[Arc<S>],
    resource: &str,
    bound: Option<Duration>,
) -> Vec<LockResult<bool>> {
    fan_out(stores, bound, |store| {
        let resource = resource.to_string();
        async move { store.exists(&resource).await }
    })
    .await
}

/// Number of stores that answered `Ok(true)`.
pub(crate) fn count_accepted(results: &[LockResult<bool>]) -> usize {
    results
        .iter()
        .filter(|result| matches!(result, Ok(true)))
        .count()
}
