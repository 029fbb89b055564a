//! Tests for the quorum policies.

use quorum_lock::{MajorityQuorum, Quorum, QuorumError, UnanimousQuorum};

fn majority(total: usize) -> MajorityQuorum {
    let mut quorum = MajorityQuorum::new();
    quorum.init(total).unwrap();
    quorum
}

fn unanimous(total: usize) -> UnanimousQuorum {
    let mut quorum = UnanimousQuorum::new();
    quorum.init(total).unwrap();
    quorum
}

#[test]
fn test_majority_thresholds_for_small_totals() {
    for (total, threshold) in [(1, 1), (2, 2), (3, 2), (4, 3)] {
        assert_eq!(majority(total).threshold(), Some(threshold), "total = {total}");
    }
}

#[test]
fn test_majority_of_four() {
    let quorum = majority(4);
    assert!(!quorum.is_met(2).unwrap());
    assert!(quorum.is_met(3).unwrap());
    assert!(quorum.is_met(4).unwrap());
}

#[test]
fn test_majority_is_met_exactly_from_half_plus_one() {
    for total in 1..=50 {
        let quorum = majority(total);
        let threshold = total / 2 + 1;
        assert!(!quorum.is_met(threshold - 1).unwrap(), "total = {total}");
        assert!(quorum.is_met(threshold).unwrap(), "total = {total}");
    }
}

#[test]
fn test_unanimous_of_ten() {
    let quorum = unanimous(10);
    assert!(!quorum.is_met(9).unwrap());
    assert!(quorum.is_met(10).unwrap());
}

#[test]
fn test_unanimous_rejects_any_missing_participant() {
    for total in 1..=20 {
        let quorum = unanimous(total);
        for successes in 0..total {
            assert!(!quorum.is_met(successes).unwrap());
        }
        assert!(quorum.is_met(total).unwrap());
    }
}

#[test]
fn test_querying_before_init_is_an_error() {
    assert_eq!(
        MajorityQuorum::new().is_met(1),
        Err(QuorumError::NotInitialized)
    );
    assert_eq!(
        UnanimousQuorum::new().is_met(1),
        Err(QuorumError::NotInitialized)
    );
}

#[test]
fn test_success_count_above_total_is_an_error() {
    assert_eq!(
        majority(3).is_met(4),
        Err(QuorumError::SuccessOutOfRange {
            successes: 4,
            total: 3
        })
    );
    assert_eq!(
        unanimous(3).is_met(4),
        Err(QuorumError::SuccessOutOfRange {
            successes: 4,
            total: 3
        })
    );
}

#[test]
fn test_init_needs_at_least_one_participant() {
    assert_eq!(MajorityQuorum::new().init(0), Err(QuorumError::InvalidTotal(0)));
    assert_eq!(UnanimousQuorum::new().init(0), Err(QuorumError::InvalidTotal(0)));
}
