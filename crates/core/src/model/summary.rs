use chrono::{DateTime, Utc};

use crate::model::ids::LessonId;
use crate::model::rewards::RewardSettings;

/// Result of completing a lesson.
///
/// Transient: the engine hands it to the caller and keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSummary {
    pub lesson_id: LessonId,
    pub xp_earned: u32,
    /// Percentage of exercises answered correctly, 0-100.
    pub accuracy: u8,
    pub is_perfect: bool,
    pub correct: u32,
    pub incorrect: u32,
    pub total_exercises: u32,
    pub hearts_lost: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl LessonSummary {
    /// Whole seconds spent in the lesson; zero if the clock went backwards.
    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        let secs = self
            .completed_at
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(secs).unwrap_or(0)
    }
}

/// Balances the learner-profile store must add after a completed lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardDelta {
    pub xp: u32,
    pub gems: u32,
}

impl RewardDelta {
    #[must_use]
    pub fn for_summary(summary: &LessonSummary, settings: &RewardSettings) -> Self {
        let gems = if summary.is_perfect {
            settings.perfect_gems()
        } else {
            settings.completion_gems()
        };
        Self {
            xp: summary.xp_earned,
            gems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn summary(is_perfect: bool) -> LessonSummary {
        let now = fixed_now();
        LessonSummary {
            lesson_id: LessonId::new(1),
            xp_earned: if is_perfect { 15 } else { 10 },
            accuracy: if is_perfect { 100 } else { 50 },
            is_perfect,
            correct: 2,
            incorrect: u32::from(!is_perfect),
            total_exercises: 2,
            hearts_lost: 0,
            started_at: now,
            completed_at: now + chrono::Duration::seconds(90),
        }
    }

    #[test]
    fn perfect_run_earns_two_gems() {
        let delta = RewardDelta::for_summary(&summary(true), &RewardSettings::default());
        assert_eq!(delta, RewardDelta { xp: 15, gems: 2 });
    }

    #[test]
    fn ordinary_run_earns_one_gem() {
        let delta = RewardDelta::for_summary(&summary(false), &RewardSettings::default());
        assert_eq!(delta, RewardDelta { xp: 10, gems: 1 });
    }

    #[test]
    fn time_spent_is_measured_in_seconds() {
        assert_eq!(summary(true).time_spent_secs(), 90);
    }
}
