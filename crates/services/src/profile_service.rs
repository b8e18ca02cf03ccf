use std::sync::Arc;

use tracing::{debug, info};

use learn_core::Clock;
use learn_core::model::{LearnerProfile, RewardDelta};
use storage::repository::ProfileRepository;

use crate::error::ProfileServiceError;

/// Applies lesson deltas to the learner's stored balances.
#[derive(Clone)]
pub struct ProfileService {
    clock: Clock,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            clock: Clock::default(),
            profiles,
        }
    }

    /// Clock whose date drives the daily streak.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if the profile cannot be read.
    pub async fn profile(&self) -> Result<LearnerProfile, ProfileServiceError> {
        Ok(self.profiles.load_profile().await?)
    }

    /// Deduct one heart after an incorrect answer.
    ///
    /// Returns `false` when the deduction was not applied: the learner is on a
    /// paid tier or already has no hearts left.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if the profile cannot be read or saved.
    pub async fn apply_heart_loss(&self) -> Result<bool, ProfileServiceError> {
        let mut profile = self.profiles.load_profile().await?;
        if profile.tier().has_unlimited_hearts() {
            debug!(tier = %profile.tier(), "heart loss waived");
            return Ok(false);
        }
        if !profile.remove_hearts(1) {
            debug!("no hearts left to deduct");
            return Ok(false);
        }
        self.profiles.save_profile(&profile).await?;
        debug!(hearts = profile.hearts(), "heart deducted");
        Ok(true)
    }

    /// Credit XP and gems earned by a completed lesson, and count today
    /// towards the streak.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if the profile cannot be read or saved.
    pub async fn apply_rewards(
        &self,
        delta: RewardDelta,
    ) -> Result<LearnerProfile, ProfileServiceError> {
        let mut profile = self.profiles.load_profile().await?;
        profile.add_xp(delta.xp);
        profile.add_gems(delta.gems);
        let streak_advanced = profile.record_activity(self.clock.now().date_naive());
        self.profiles.save_profile(&profile).await?;
        info!(
            xp = delta.xp,
            gems = delta.gems,
            total_xp = profile.total_xp(),
            streak = profile.streak().current,
            streak_advanced,
            "rewards applied"
        );
        Ok(profile)
    }

    /// Refill hearts, capped at the profile's capacity. Returns the new count.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if the profile cannot be read or saved.
    pub async fn refill_hearts(&self, amount: u32) -> Result<u32, ProfileServiceError> {
        let mut profile = self.profiles.load_profile().await?;
        profile.add_hearts(amount);
        self.profiles.save_profile(&profile).await?;
        Ok(profile.hearts())
    }

    /// Spend gems. Returns `false` and changes nothing when the balance is too low.
    ///
    /// # Errors
    ///
    /// Returns `ProfileServiceError::Storage` if the profile cannot be read or saved.
    pub async fn spend_gems(&self, amount: u32) -> Result<bool, ProfileServiceError> {
        let mut profile = self.profiles.load_profile().await?;
        if !profile.remove_gems(amount) {
            return Ok(false);
        }
        self.profiles.save_profile(&profile).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use learn_core::model::{STARTING_GEMS, Streak, SubscriptionTier};
    use learn_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn service(profile: LearnerProfile) -> ProfileService {
        ProfileService::new(Arc::new(InMemoryRepository::with_profile(profile)))
            .with_clock(fixed_clock())
    }

    #[tokio::test]
    async fn heart_loss_applies_on_free_tier() {
        let svc = service(LearnerProfile::new());
        assert!(svc.apply_heart_loss().await.unwrap());
        assert_eq!(svc.profile().await.unwrap().hearts(), 4);
    }

    #[tokio::test]
    async fn heart_loss_waived_for_paid_tier() {
        let svc = service(LearnerProfile::new().with_tier(SubscriptionTier::Max));
        assert!(!svc.apply_heart_loss().await.unwrap());
        assert_eq!(svc.profile().await.unwrap().hearts(), 5);
    }

    #[tokio::test]
    async fn heart_loss_stops_at_zero() {
        let svc = service(LearnerProfile::new());
        for _ in 0..5 {
            assert!(svc.apply_heart_loss().await.unwrap());
        }
        assert!(!svc.apply_heart_loss().await.unwrap());
        assert_eq!(svc.profile().await.unwrap().hearts(), 0);
    }

    #[tokio::test]
    async fn rewards_add_xp_and_gems() {
        let svc = service(LearnerProfile::new());
        let profile = svc.apply_rewards(RewardDelta { xp: 15, gems: 2 }).await.unwrap();
        assert_eq!(profile.total_xp(), 15);
        assert_eq!(profile.gems(), STARTING_GEMS + 2);
        assert_eq!(svc.profile().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn rewards_on_the_same_day_count_once_towards_streak() {
        let svc = service(LearnerProfile::new());
        svc.apply_rewards(RewardDelta { xp: 10, gems: 1 }).await.unwrap();
        let profile = svc.apply_rewards(RewardDelta { xp: 10, gems: 1 }).await.unwrap();
        assert_eq!(profile.total_xp(), 20);
        assert_eq!(profile.streak().current, 1);
        assert_eq!(profile.streak().last_activity, Some(fixed_now().date_naive()));
    }

    #[tokio::test]
    async fn rewards_on_the_next_day_extend_streak() {
        let yesterday = (fixed_now() - Duration::days(1)).date_naive();
        let svc = service(LearnerProfile::new().with_streak(Streak {
            current: 4,
            longest: 4,
            last_activity: Some(yesterday),
        }));
        let profile = svc.apply_rewards(RewardDelta { xp: 10, gems: 1 }).await.unwrap();
        assert_eq!(profile.streak().current, 5);
        assert_eq!(profile.streak().longest, 5);
    }

    #[tokio::test]
    async fn refill_is_capped() {
        let svc = service(LearnerProfile::new());
        svc.apply_heart_loss().await.unwrap();
        svc.apply_heart_loss().await.unwrap();
        assert_eq!(svc.refill_hearts(10).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn spend_gems_requires_balance() {
        let svc = service(LearnerProfile::new());
        assert!(svc.spend_gems(200).await.unwrap());
        assert!(!svc.spend_gems(400).await.unwrap());
        assert_eq!(svc.profile().await.unwrap().gems(), STARTING_GEMS - 200);
    }
}
