//! Redis lock store for quorum-based distributed locks.
//!
//! Each Redis server is one independent [`LockStore`](quorum_lock_core::LockStore).
//! Hand several of them to a `MultiStoreLocker` to get the RedLock scheme.

pub mod builder;
pub mod store;

pub use builder::{RedisLockStoreBuilder, connect_all};
pub use store::RedisLockStore;
