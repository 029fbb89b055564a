//! Contract for one backing lock store.

use std::future::Future;
use std::time::Duration;

use crate::error::LockResult;
use crate::lock::Lock;

/// One independent backend able to hold locks.
///
/// Implementations must make `set` and `delete` single atomic operations on
/// the backend: a client-side read followed by a write lets two holders
/// race. Errors returned from these methods are treated by lockers as "this
/// store did not succeed".
///
/// # Example
///
/// ```rust,ignore
/// let lock = Lock::new("invoices", token);
/// if store.set(&lock, Some(Duration::from_secs(10))).await? {
///     // ... critical section ...
///     store.delete(&lock).await?;
/// }
/// ```
pub trait LockStore: Send + Sync + 'static {
    /// Creates the resource entry bound to `lock.token()` only if no entry
    /// exists. With a TTL the entry expires on its own.
    fn set(
        &self,
        lock: &Lock,
        ttl: Option<Duration>,
    ) -> impl Future<Output = LockResult<bool>> + Send;

    /// Whether any entry for `resource` exists, whatever its token.
    fn exists(&self, resource: &str) -> impl Future<Output = LockResult<bool>> + Send;

    /// Deletes the entry only if it is still bound to `lock.token()`.
    fn delete(&self, lock: &Lock) -> impl Future<Output = LockResult<bool>> + Send;

    /// Clock and latency slack this store adds to the TTL budget.
    fn drift(&self, ttl: Option<Duration>) -> Duration;

    /// Whether the store can serve requests. Checked once when a locker is built.
    fn is_ready(&self) -> bool {
        true
    }
}
