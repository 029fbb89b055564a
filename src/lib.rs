//! Distributed mutual exclusion over independent lock stores.
//!
//! A lock on a named resource is written to every store; the attempt counts
//! when a quorum of stores accepted it fast enough for the TTL to still mean
//! something once clock drift is accounted for. Otherwise the partial lock is
//! reset everywhere and the attempt is retried with a fresh token.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quorum_lock::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stores = connect_all(&[
//!         "redis://server1:6379",
//!         "redis://server2:6379",
//!         "redis://server3:6379",
//!     ])
//!     .await?;
//!
//!     let locker = MultiStoreLocker::builder()
//!         .stores(stores)
//!         .quorum(MajorityQuorum::new())
//!         .build()?;
//!
//!     let options = LockOptions::new()
//!         .with_ttl(Duration::from_secs(10))
//!         .with_retry(3, Duration::from_millis(200));
//!     let lock = locker.lock("invoices", options).await?;
//!
//!     // Critical section, valid until `lock.validity_end_time()`
//!
//!     locker.unlock(&lock).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Lockers
//!
//! - [`SingleStoreLocker`]: one store, no quorum.
//! - [`MultiStoreLocker`]: N stores, pluggable quorum (majority by default),
//!   drift of the least precise store.
//! - [`MultiInstanceLocker`]: N stores that must all accept the lock.
//!
//! # Stores
//!
//! - [`RedisLockStore`]: one Redis server per store.
//! - [`InMemoryLockStore`]: an in-process map, for tests and single-process use.
//!
//! # Crate Organization
//!
//! This is a meta-crate that re-exports types from:
//! - `quorum-lock-core`: lockers, quorum policies and the store contract
//! - `quorum-lock-redis`: Redis lock store

// Re-export core types and traits
#[allow(ambiguous_glob_reexports)]
pub use quorum_lock_core::*;

// Re-export redis backend
#[allow(ambiguous_glob_reexports)]
pub use quorum_lock_redis::*;
