//! Hearts (lives) rules for a lesson session.

use crate::model::SubscriptionTier;

/// Outcome of charging one submission against the session's hearts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartCharge {
    pub hearts_remaining: u32,
    /// A deduction event the profile store must be told about. Raised for
    /// every incorrect answer, even when the session counter is already at
    /// zero or the learner is on a paid tier.
    pub deduction_reported: bool,
}

/// Charge a verdict: incorrect answers cost one heart, saturating at zero.
#[must_use]
pub fn charge(hearts_remaining: u32, correct: bool) -> HeartCharge {
    if correct {
        return HeartCharge {
            hearts_remaining,
            deduction_reported: false,
        };
    }
    HeartCharge {
        hearts_remaining: hearts_remaining.saturating_sub(1),
        deduction_reported: true,
    }
}

/// Whether the session has to end now instead of advancing.
///
/// Only free-tier learners are cut short; paid tiers keep going at zero.
#[must_use]
pub fn must_end_session(hearts_remaining: u32, tier: SubscriptionTier) -> bool {
    hearts_remaining == 0 && !tier.has_unlimited_hearts()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_answer_is_free() {
        let charged = charge(3, true);
        assert_eq!(charged.hearts_remaining, 3);
        assert!(!charged.deduction_reported);
    }

    #[test]
    fn incorrect_answer_costs_one_heart() {
        let charged = charge(3, false);
        assert_eq!(charged.hearts_remaining, 2);
        assert!(charged.deduction_reported);
    }

    #[test]
    fn hearts_floor_at_zero_but_still_report() {
        let mut hearts = 5;
        for _ in 0..7 {
            let charged = charge(hearts, false);
            assert!(charged.deduction_reported);
            hearts = charged.hearts_remaining;
        }
        assert_eq!(hearts, 0);
    }

    #[test]
    fn only_free_tier_ends_at_zero() {
        assert!(must_end_session(0, SubscriptionTier::Free));
        assert!(!must_end_session(1, SubscriptionTier::Free));
        assert!(!must_end_session(0, SubscriptionTier::Super));
        assert!(!must_end_session(0, SubscriptionTier::Max));
    }
}
