//! Clock drift budgets subtracted from a lock's TTL.

use std::time::Duration;

/// Drift policy of a store: a share of the TTL plus a fixed precision margin.
///
/// The share is expressed in basis points (1/100 of a percent) and rounded
/// up to the next millisecond. The margin covers the backend's own expiry
/// timer granularity and is added even when no TTL is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDrift {
    basis_points: u64,
    precision: Duration,
}

impl ClockDrift {
    /// 1% of the TTL plus 2 ms for Redis' millisecond expiry precision.
    pub const REDIS: Self = Self::new(100, Duration::from_millis(2));

    pub const fn new(basis_points: u64, precision: Duration) -> Self {
        Self {
            basis_points,
            precision,
        }
    }

    pub fn precision(&self) -> Duration {
        self.precision
    }

    /// Drift to add to the elapsed locking time for the given TTL.
    pub fn for_ttl(&self, ttl: Option<Duration>) -> Duration {
        let proportional = match ttl {
            Some(ttl) if !ttl.is_zero() => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
                millis.saturating_mul(self.basis_points).div_ceil(10_000)
            }
            _ => 0,
        };
        Duration::from_millis(proportional) + self.precision
    }
}

impl Default for ClockDrift {
    fn default() -> Self {
        Self::REDIS
    }
}

/// How a multi-store locker combines the drift of its stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriftAggregation {
    /// The least precise store dominates.
    #[default]
    Max,
    /// Only the first store counts.
    First,
}

impl DriftAggregation {
    pub fn aggregate(self, drifts: impl IntoIterator<Item = Duration>) -> Duration {
        let mut drifts = drifts.into_iter();
        match self {
            Self::Max => drifts.max(),
            Self::First => drifts.next(),
        }
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redis_drift_without_ttl_is_the_precision_margin() {
        assert_eq!(ClockDrift::REDIS.for_ttl(None), Duration::from_millis(2));
        assert_eq!(
            ClockDrift::REDIS.for_ttl(Some(Duration::ZERO)),
            Duration::from_millis(2)
        );
    }

    #[test]
    fn redis_drift_rounds_the_share_up() {
        assert_eq!(
            ClockDrift::REDIS.for_ttl(Some(Duration::from_millis(100))),
            Duration::from_millis(3)
        );
        assert_eq!(
            ClockDrift::REDIS.for_ttl(Some(Duration::from_millis(101))),
            Duration::from_millis(4)
        );
        assert_eq!(
            ClockDrift::REDIS.for_ttl(Some(Duration::from_millis(300))),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn aggregation() {
        let drifts = [Duration::from_millis(2), Duration::from_millis(7)];
        assert_eq!(DriftAggregation::Max.aggregate(drifts), Duration::from_millis(7));
        assert_eq!(DriftAggregation::First.aggregate(drifts), Duration::from_millis(2));
        assert_eq!(DriftAggregation::Max.aggregate([]), Duration::ZERO);
    }
}
