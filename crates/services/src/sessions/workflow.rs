use std::sync::Arc;

use tracing::{info, warn};

use learn_core::Clock;
use learn_core::model::{
    Answer, LessonId, LessonSummary, RewardDelta, RewardSettings, SubscriptionTier,
};
use storage::repository::{LessonCatalog, ProfileRepository};

use super::engine::LessonEngine;
use super::state::{EngineState, Verdict};
use crate::error::SessionError;
use crate::profile_service::ProfileService;

/// How a finished lesson ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonOutcome {
    pub summary: LessonSummary,
    /// Balances credited to the profile; `None` when the lesson ended early.
    pub rewards: Option<RewardDelta>,
    /// A free-tier learner ran out of hearts; no rewards were applied.
    pub ended_early: bool,
}

/// Result of asking the loop to continue after feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonStep {
    /// The cursor moved; present `engine.current_exercise()`.
    Next,
    /// The lesson is over and the engine has been reset.
    Finished(LessonOutcome),
}

/// Answer verdict plus whether the profile store honored the heart loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonAnswerResult {
    pub verdict: Verdict,
    pub heart_applied: bool,
}

/// Orchestrates catalogue lookup, the engine, and profile bookkeeping.
#[derive(Clone)]
pub struct LessonLoopService {
    clock: Clock,
    rewards: RewardSettings,
    catalog: Arc<dyn LessonCatalog>,
    profiles: ProfileService,
    max_hearts: Option<u32>,
}

impl LessonLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<dyn LessonCatalog>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            clock,
            rewards: RewardSettings::default(),
            catalog,
            profiles: ProfileService::new(profiles).with_clock(clock),
            max_hearts: None,
        }
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardSettings) -> Self {
        self.rewards = rewards;
        self
    }

    /// Start sessions with this many hearts instead of the learner's balance.
    #[must_use]
    pub fn with_max_hearts(mut self, max_hearts: Option<u32>) -> Self {
        self.max_hearts = max_hearts;
        self
    }

    #[must_use]
    pub fn profiles(&self) -> &ProfileService {
        &self.profiles
    }

    /// Build an engine sharing this loop's clock and reward settings.
    #[must_use]
    pub fn engine(&self) -> LessonEngine {
        LessonEngine::new(self.clock).with_rewards(self.rewards)
    }

    /// Load a lesson and start it on `engine`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::LessonUnavailable` if the lesson is missing or has no
    /// exercises, `SessionError::OutOfHearts` for a free-tier learner with no
    /// hearts, and `SessionError::Storage`/`Profile` for repository failures.
    /// The engine is untouched on error.
    pub async fn start_lesson(
        &self,
        engine: &mut LessonEngine,
        lesson_id: LessonId,
    ) -> Result<(), SessionError> {
        let lesson = self
            .catalog
            .lesson_by_id(lesson_id)
            .await?
            .ok_or(SessionError::LessonUnavailable(lesson_id))?;
        let exercises = self.catalog.exercises_for_lesson(lesson_id).await?;
        if exercises.is_empty() {
            warn!(lesson_id = %lesson_id, "lesson has no exercises");
            return Err(SessionError::LessonUnavailable(lesson_id));
        }

        let profile = self.profiles.profile().await?;
        let tier = profile.tier();
        if tier == SubscriptionTier::Free && profile.hearts() == 0 {
            return Err(SessionError::OutOfHearts);
        }

        let max_hearts = self.max_hearts.unwrap_or(profile.hearts());
        engine.set_tier(tier);
        engine.start(lesson, exercises, max_hearts)?;
        Ok(())
    }

    /// Submit an answer for the current exercise and apply any heart loss to
    /// the profile.
    ///
    /// # Errors
    ///
    /// Returns engine errors unchanged, and `SessionError::Profile` if the
    /// deduction cannot be stored.
    pub async fn answer(
        &self,
        engine: &mut LessonEngine,
        answer: Answer,
    ) -> Result<LessonAnswerResult, SessionError> {
        let exercise_id = engine
            .current_exercise()
            .map(|exercise| exercise.id())
            .ok_or(SessionError::NoActiveSession)?;
        let verdict = engine.submit_answer(exercise_id, answer)?;
        let heart_applied = if verdict.heart_deducted {
            self.profiles.apply_heart_loss().await?
        } else {
            false
        };
        Ok(LessonAnswerResult {
            verdict,
            heart_applied,
        })
    }

    /// Continue after feedback: advance, or finish the lesson.
    ///
    /// A lesson that ran out of hearts finishes without rewards. Finishing
    /// resets the engine.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when idle, and
    /// `SessionError::Profile` if rewards cannot be stored.
    pub async fn advance(&self, engine: &mut LessonEngine) -> Result<LessonStep, SessionError> {
        let out_of_hearts = engine
            .session()
            .ok_or(SessionError::NoActiveSession)?
            .out_of_hearts();
        if !out_of_hearts && engine.next_exercise()? {
            return Ok(LessonStep::Next);
        }

        let summary = engine.complete_lesson()?;
        let rewards = if out_of_hearts {
            info!(lesson_id = %summary.lesson_id, "lesson ended without hearts");
            None
        } else {
            let delta = RewardDelta::for_summary(&summary, &self.rewards);
            self.profiles.apply_rewards(delta).await?;
            Some(delta)
        };
        engine.reset_lesson();

        Ok(LessonStep::Finished(LessonOutcome {
            summary,
            rewards,
            ended_early: out_of_hearts,
        }))
    }

    /// Abandon the lesson without rewards.
    pub fn quit(&self, engine: &mut LessonEngine) {
        if engine.state() != EngineState::Idle {
            info!("lesson abandoned");
        }
        engine.reset_lesson();
    }
}
