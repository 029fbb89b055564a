//! Error types for quorum lock operations.

use std::time::Duration;
use thiserror::Error;

/// Contract violations reported by a [`Quorum`](crate::quorum::Quorum).
///
/// These are programming errors: lockers surface them immediately and never
/// retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuorumError {
    /// The participant count handed to `init` was below one.
    #[error("quorum needs at least one participant, got {0}")]
    InvalidTotal(usize),

    /// The quorum was queried before `init`.
    #[error("quorum must be initialized before it is queried")]
    NotInitialized,

    /// The success count is larger than the participant count.
    #[error("success count {successes} is outside [0, {total}]")]
    SuccessOutOfRange { successes: usize, total: usize },
}

/// Why a single acquisition attempt was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Fewer stores accepted the lock than the quorum requires.
    #[error("quorum has not been met ({successes} of {total} stores)")]
    QuorumNotMet { successes: usize, total: usize },

    /// Locking took so long that the remaining validity is not trustworthy.
    #[error("time to lock the resource ({elapsed:?} + {drift:?} drift) has exceeded the ttl {ttl:?}")]
    TtlExceeded {
        elapsed: Duration,
        drift: Duration,
        ttl: Duration,
    },

    /// The single backing store refused the lock.
    #[error("the store refused the lock")]
    StoreRejected,
}

/// Errors that can occur during lock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The locker could not be built from the given stores or policies.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Every attempt to lock the resource failed.
    #[error("failed locking `{resource}` after {attempts} attempt(s): {last_failure}")]
    Locking {
        resource: String,
        attempts: u32,
        last_failure: AttemptFailure,
    },

    /// At least one store still holds the resource after the release sweep.
    #[error("failed releasing `{resource}`: still present on {failed_stores} store(s)")]
    Unlocking {
        resource: String,
        failed_stores: usize,
    },

    /// A quorum policy was misused.
    #[error(transparent)]
    Quorum(#[from] QuorumError),

    /// A single store call did not finish within its bound.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Backend connection failed.
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
