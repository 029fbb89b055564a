//! Quorum policies deciding whether enough stores accepted a lock.
//!
//! A quorum starts uninitialized and becomes usable after a single call to
//! [`Quorum::init`] with the participant count. Lockers do that once, at
//! construction time.

use std::fmt::Debug;

use crate::error::QuorumError;

/// Policy judging an attempt by its number of successful stores.
pub trait Quorum: Send + Sync + Debug {
    /// Records the participant count. `total` must be at least one.
    fn init(&mut self, total: usize) -> Result<(), QuorumError>;

    /// Whether `successes` out of the initialized total is good enough.
    ///
    /// Errors if the quorum was never initialized or if `successes`
    /// exceeds the total.
    fn is_met(&self, successes: usize) -> Result<bool, QuorumError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Threshold {
    total: usize,
    required: usize,
}

impl Threshold {
    fn check(threshold: Option<Self>, successes: usize) -> Result<bool, QuorumError> {
        let threshold = threshold.ok_or(QuorumError::NotInitialized)?;
        if successes > threshold.total {
            return Err(QuorumError::SuccessOutOfRange {
                successes,
                total: threshold.total,
            });
        }
        Ok(successes >= threshold.required)
    }
}

fn validate_total(total: usize) -> Result<usize, QuorumError> {
    if total < 1 {
        return Err(QuorumError::InvalidTotal(total));
    }
    Ok(total)
}

/// Met once more than half of the participants succeeded.
///
/// For N participants the threshold is `N / 2 + 1`.
#[derive(Debug, Clone, Default)]
pub struct MajorityQuorum {
    threshold: Option<Threshold>,
}

impl MajorityQuorum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum number of successes, once initialized.
    pub fn threshold(&self) -> Option<usize> {
        self.threshold.map(|t| t.required)
    }
}

impl Quorum for MajorityQuorum {
    fn init(&mut self, total: usize) -> Result<(), QuorumError> {
        let total = validate_total(total)?;
        self.threshold = Some(Threshold {
            total,
            required: total / 2 + 1,
        });
        Ok(())
    }

    fn is_met(&self, successes: usize) -> Result<bool, QuorumError> {
        Threshold::check(self.threshold, successes)
    }
}

/// Met only when every participant succeeded.
#[derive(Debug, Clone, Default)]
pub struct UnanimousQuorum {
    threshold: Option<Threshold>,
}

impl UnanimousQuorum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(&self) -> Option<usize> {
        self.threshold.map(|t| t.required)
    }
}

impl Quorum for UnanimousQuorum {
    fn init(&mut self, total: usize) -> Result<(), QuorumError> {
        let total = validate_total(total)?;
        self.threshold = Some(Threshold {
            total,
            required: total,
        });
        Ok(())
    }

    fn is_met(&self, successes: usize) -> Result<bool, QuorumError> {
        Threshold::check(self.threshold, successes)
    }
}
