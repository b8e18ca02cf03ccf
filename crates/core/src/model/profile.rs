use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default heart capacity for a new learner.
pub const DEFAULT_HEARTS_MAX: u32 = 5;

/// Gem balance a new learner starts with.
pub const STARTING_GEMS: u32 = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("heart capacity must be > 0")]
    InvalidHeartsMax,

    #[error("hearts ({hearts}) exceed capacity ({max})")]
    HeartsOverCapacity { hearts: u32, max: u32 },

    #[error("unknown subscription tier: {0}")]
    UnknownTier(String),
}

//
// ─── SUBSCRIPTION TIER ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Super,
    Max,
}

impl SubscriptionTier {
    /// Paid tiers have unlimited hearts.
    #[must_use]
    pub fn has_unlimited_hearts(self) -> bool {
        !matches!(self, SubscriptionTier::Free)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Super => "super",
            SubscriptionTier::Max => "max",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "super" => Ok(Self::Super),
            "max" => Ok(Self::Max),
            other => Err(ProfileError::UnknownTier(other.to_owned())),
        }
    }
}

//
// ─── STREAK ────────────────────────────────────────────────────────────────────
//

/// Consecutive-day activity counter.
///
/// Advances at most once per calendar day, on the first XP credit of that day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<NaiveDate>,
}

impl Streak {
    /// Record activity on `day`. Returns `false` if `day` was already counted.
    pub fn record(&mut self, day: NaiveDate) -> bool {
        if self.last_activity == Some(day) {
            return false;
        }
        self.current = self.current.saturating_add(1);
        self.longest = self.longest.max(self.current);
        self.last_activity = Some(day);
        true
    }
}

//
// ─── PROFILE ───────────────────────────────────────────────────────────────────
//

/// Gamification balances of a learner.
///
/// Owned by the profile store; the lesson engine only reads hearts and tier
/// and reports deltas back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerProfile {
    total_xp: u64,
    gems: u32,
    hearts: u32,
    hearts_max: u32,
    tier: SubscriptionTier,
    streak: Streak,
}

impl LearnerProfile {
    /// A fresh free-tier profile with full hearts and the starting gem balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_xp: 0,
            gems: STARTING_GEMS,
            hearts: DEFAULT_HEARTS_MAX,
            hearts_max: DEFAULT_HEARTS_MAX,
            tier: SubscriptionTier::Free,
            streak: Streak::default(),
        }
    }

    /// Rehydrate a profile from stored balances.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError` if the heart capacity is zero or exceeded.
    pub fn from_persisted(
        total_xp: u64,
        gems: u32,
        hearts: u32,
        hearts_max: u32,
        tier: SubscriptionTier,
    ) -> Result<Self, ProfileError> {
        if hearts_max == 0 {
            return Err(ProfileError::InvalidHeartsMax);
        }
        if hearts > hearts_max {
            return Err(ProfileError::HeartsOverCapacity {
                hearts,
                max: hearts_max,
            });
        }
        Ok(Self {
            total_xp,
            gems,
            hearts,
            hearts_max,
            tier,
            streak: Streak::default(),
        })
    }

    #[must_use]
    pub fn with_tier(mut self, tier: SubscriptionTier) -> Self {
        self.tier = tier;
        self
    }

    #[must_use]
    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    #[must_use]
    pub fn gems(&self) -> u32 {
        self.gems
    }

    #[must_use]
    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    #[must_use]
    pub fn hearts_max(&self) -> u32 {
        self.hearts_max
    }

    #[must_use]
    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    pub fn set_tier(&mut self, tier: SubscriptionTier) {
        self.tier = tier;
    }

    #[must_use]
    pub fn with_streak(mut self, streak: Streak) -> Self {
        self.streak = streak;
        self
    }

    #[must_use]
    pub fn streak(&self) -> Streak {
        self.streak
    }

    /// Count `day` towards the streak. See `Streak::record`.
    pub fn record_activity(&mut self, day: NaiveDate) -> bool {
        self.streak.record(day)
    }

    pub fn add_xp(&mut self, amount: u32) {
        self.total_xp = self.total_xp.saturating_add(u64::from(amount));
    }

    pub fn add_gems(&mut self, amount: u32) {
        self.gems = self.gems.saturating_add(amount);
    }

    /// Spend gems. Returns `false` and leaves the balance untouched when it is
    /// too low.
    pub fn remove_gems(&mut self, amount: u32) -> bool {
        if self.gems < amount {
            return false;
        }
        self.gems -= amount;
        true
    }

    /// Refill hearts, capped at capacity.
    pub fn add_hearts(&mut self, amount: u32) {
        self.hearts = self.hearts.saturating_add(amount).min(self.hearts_max);
    }

    /// Deduct hearts.
    ///
    /// Paid tiers are exempt: the call succeeds without touching the balance.
    /// On the free tier the call fails when fewer than `amount` remain.
    pub fn remove_hearts(&mut self, amount: u32) -> bool {
        if self.tier.has_unlimited_hearts() {
            return true;
        }
        if self.hearts < amount {
            return false;
        }
        self.hearts -= amount;
        true
    }
}

impl Default for LearnerProfile {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
