//! Core protocol for quorum-based distributed locks.
//!
//! A [`Locker`](locker::Locker) fans a lock out to one or more independent
//! [`LockStore`](store::LockStore)s, judges the outcome with a
//! [`Quorum`](quorum::Quorum), defends the TTL against latency and clock
//! drift, and retries with a fresh token when an attempt is rejected.

pub mod drift;
pub mod error;
pub mod lock;
pub mod locker;
pub mod memory;
pub mod observer;
pub mod prelude;
pub mod quorum;
pub mod store;
pub mod timing;
pub mod token;

pub use error::{LockError, LockResult};
pub use prelude::*;
