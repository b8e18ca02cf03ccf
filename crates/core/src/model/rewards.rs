use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RewardSettingsError {
    #[error("perfect-run gems ({perfect}) must be >= completion gems ({completion})")]
    PerfectBelowCompletion { perfect: u32, completion: u32 },
}

/// Reward knobs applied when a lesson completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSettings {
    perfect_bonus_xp: u32,
    perfect_gems: u32,
    completion_gems: u32,
}

impl RewardSettings {
    /// Creates custom reward settings.
    ///
    /// # Errors
    ///
    /// Returns `RewardSettingsError::PerfectBelowCompletion` if a perfect run
    /// would earn fewer gems than an ordinary one.
    pub fn new(
        perfect_bonus_xp: u32,
        perfect_gems: u32,
        completion_gems: u32,
    ) -> Result<Self, RewardSettingsError> {
        if perfect_gems < completion_gems {
            return Err(RewardSettingsError::PerfectBelowCompletion {
                perfect: perfect_gems,
                completion: completion_gems,
            });
        }
        Ok(Self {
            perfect_bonus_xp,
            perfect_gems,
            completion_gems,
        })
    }

    /// Bonus XP added on top of the lesson reward for a perfect run.
    #[must_use]
    pub fn perfect_bonus_xp(&self) -> u32 {
        self.perfect_bonus_xp
    }

    #[must_use]
    pub fn perfect_gems(&self) -> u32 {
        self.perfect_gems
    }

    #[must_use]
    pub fn completion_gems(&self) -> u32 {
        self.completion_gems
    }
}

impl Default for RewardSettings {
    /// +5 XP for a perfect run, 2 gems for perfect, 1 gem otherwise.
    fn default() -> Self {
        Self {
            perfect_bonus_xp: 5,
            perfect_gems: 2,
            completion_gems: 1,
        }
    }
}
