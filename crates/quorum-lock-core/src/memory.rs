//! In-process lock store.
//!
//! Useful for tests and for single-process deployments. Clones share the same
//! map, so several lockers can contend on one "backend".

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::drift::ClockDrift;
use crate::error::{LockError, LockResult};
use crate::lock::Lock;
use crate::store::LockStore;

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A [`LockStore`] backed by a mutex-guarded map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLockStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    drift: ClockDrift,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom drift policy instead of [`ClockDrift::REDIS`].
    pub fn with_drift(mut self, drift: ClockDrift) -> Self {
        self.drift = drift;
        self
    }

    /// Token currently bound to `resource`, if any.
    pub fn token_of(&self, resource: &str) -> LockResult<Option<String>> {
        let mut entries = self.entries()?;
        Ok(Self::live_entry(&mut entries, resource).map(|entry| entry.token.clone()))
    }

    /// Number of entries held. Expired entries count until the next `set`
    /// sweeps them.
    pub fn len(&self) -> LockResult<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> LockResult<bool> {
        Ok(self.len()? == 0)
    }

    fn entries(&self) -> LockResult<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries.lock().map_err(|_| {
            LockError::Backend(Box::new(std::io::Error::other(
                "in-memory lock store mutex poisoned",
            )))
        })
    }

    /// Drops the entry for `resource` if it has expired and returns what is left.
    fn live_entry<'a>(
        entries: &'a mut HashMap<String, Entry>,
        resource: &str,
    ) -> Option<&'a Entry> {
        let now = Instant::now();
        if entries.get(resource).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(resource);
        }
        entries.get(resource)
    }
}

impl LockStore for InMemoryLockStore {
    async fn set(&self, lock: &Lock, ttl: Option<Duration>) -> LockResult<bool> {
        let mut entries = self.entries()?;
        let now = Instant::now();
        entries.retain(|_, entry| !entry.is_expired(now));
        if entries.contains_key(lock.resource()) {
            return Ok(false);
        }

        let expires_at = ttl
            .filter(|ttl| !ttl.is_zero())
            .map(|ttl| now + ttl);
        entries.insert(
            lock.resource().to_string(),
            Entry {
                token: lock.token().to_string(),
                expires_at,
            },
        );
        Ok(true)
    }

    async fn exists(&self, resource: &str) -> LockResult<bool> {
        let mut entries = self.entries()?;
        Ok(Self::live_entry(&mut entries, resource).is_some())
    }

    async fn delete(&self, lock: &Lock) -> LockResult<bool> {
        let mut entries = self.entries()?;
        let owned = Self::live_entry(&mut entries, lock.resource())
            .is_some_and(|entry| entry.token == lock.token());
        if owned {
            entries.remove(lock.resource());
        }
        Ok(owned)
    }

    fn drift(&self, ttl: Option<Duration>) -> Duration {
        self.drift.for_ttl(ttl)
    }
}
