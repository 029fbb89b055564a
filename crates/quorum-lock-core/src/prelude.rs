//! Convenience prelude for quorum lock types.

pub use crate::drift::{ClockDrift, DriftAggregation};
pub use crate::error::{AttemptFailure, LockError, LockResult, QuorumError};
pub use crate::lock::{Lock, LockOptions};
pub use crate::locker::{
    Locker, LockerExt, MultiInstanceLocker, MultiStoreLocker, SingleStoreLocker,
};
pub use crate::memory::InMemoryLockStore;
pub use crate::quorum::{MajorityQuorum, Quorum, UnanimousQuorum};
pub use crate::store::LockStore;
pub use crate::token::{RandomTokenGenerator, TokenGenerator};
