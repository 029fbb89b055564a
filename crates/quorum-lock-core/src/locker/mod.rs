//! Lockers: token generation, fan-out, quorum and TTL checks, retries and
//! release.
//!
//! Three variants share the [`Locker`] contract:
//!
//! - [`SingleStoreLocker`] for exactly one store,
//! - [`MultiStoreLocker`] for N stores judged by a pluggable [`Quorum`](crate::quorum::Quorum),
//! - [`MultiInstanceLocker`] for N stores that must all accept the lock.

mod attempt;
mod fanout;
mod instance;
mod multi;
mod single;
mod store_set;

use std::future::Future;

use crate::error::{LockError, LockResult};
use crate::lock::{Lock, LockOptions};

pub use instance::{MultiInstanceLocker, MultiInstanceLockerBuilder};
pub use multi::{MultiStoreLocker, MultiStoreLockerBuilder};
pub use single::{SingleStoreLocker, SingleStoreLockerBuilder};

/// Acquires and releases named resources across the locker's stores.
///
/// # Example
///
/// ```rust,ignore
/// let lock = locker
///     .lock("invoices", LockOptions::new().with_ttl(Duration::from_secs(10)))
///     .await?;
/// // Critical section, valid until `lock.validity_end_time()`
/// locker.unlock(&lock).await?;
/// ```
pub trait Locker: Send + Sync {
    /// Locks `resource`, retrying with a fresh token up to
    /// `options.retry_count()` times.
    ///
    /// # Returns
    ///
    /// * `Ok(lock)` - Accepted; `validity_end_time` is set iff a TTL was given
    /// * `Err(LockError::Locking)` - Every attempt failed
    /// * `Err(LockError::Quorum)` - The quorum policy was misused
    fn lock(
        &self,
        resource: &str,
        options: LockOptions,
    ) -> impl Future<Output = LockResult<Lock>> + Send;

    /// Whether any store currently holds `resource`.
    fn is_locked(&self, resource: &str) -> impl Future<Output = LockResult<bool>> + Send;

    /// Releases `lock` on every store.
    ///
    /// Releasing a lock that already expired or was already released
    /// succeeds. Fails with `LockError::Unlocking` only when a store could not
    /// delete the lock and still holds the resource.
    fn unlock(&self, lock: &Lock) -> impl Future<Output = LockResult<()>> + Send;
}

/// Extension trait providing convenience methods for lockers.
pub trait LockerExt: Locker {
    /// Like [`Locker::lock`], but reports exhausted attempts as `Ok(None)`.
    fn try_lock(
        &self,
        resource: &str,
        options: LockOptions,
    ) -> impl Future<Output = LockResult<Option<Lock>>> + Send
    where
        Self: Sync,
    {
        async move {
            match self.lock(resource, options).await {
                Ok(lock) => Ok(Some(lock)),
                Err(LockError::Locking { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        }
    }
}

// Blanket implementation for all Lockers
impl<T: Locker> LockerExt for T {}
