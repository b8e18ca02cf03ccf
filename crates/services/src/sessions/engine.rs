use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use learn_core::Clock;
use learn_core::grading;
use learn_core::hearts;
use learn_core::model::{
    Answer, Exercise, ExerciseId, Lesson, LessonSummary, RewardSettings, SubscriptionTier,
};
use learn_core::scoring::{self, AnswerTally, ScoreInput};

use super::progress::SessionProgress;
use super::state::{EngineState, LessonSession, RecordedAnswer, Verdict};
use crate::error::SessionError;

/// Single-owner lesson session manager.
///
/// Holds at most one `LessonSession`. Every operation is synchronous and runs
/// to completion; callers serialize access through `&mut self`.
#[derive(Debug, Default)]
pub struct LessonEngine {
    clock: Clock,
    rewards: RewardSettings,
    tier: SubscriptionTier,
    session: Option<LessonSession>,
}

impl LessonEngine {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardSettings) -> Self {
        self.rewards = rewards;
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier: SubscriptionTier) -> Self {
        self.tier = tier;
        self
    }

    /// Tier used for sessions started from now on.
    pub fn set_tier(&mut self, tier: SubscriptionTier) {
        self.tier = tier;
    }

    #[must_use]
    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardSettings {
        &self.rewards
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Mutable access to the clock, for tests that need time to pass.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    //
    // ─── OPERATIONS ────────────────────────────────────────────────────────────
    //

    /// Start a lesson, replacing any session already in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyExerciseSet` if `exercises` is empty and
    /// `SessionError::DuplicateExercise` if two exercises share an id. The
    /// previous session, if any, is kept in both cases.
    pub fn start(
        &mut self,
        lesson: Lesson,
        exercises: Vec<Exercise>,
        max_hearts: u32,
    ) -> Result<(), SessionError> {
        if exercises.is_empty() {
            warn!(lesson_id = %lesson.id(), "refusing to start a lesson without exercises");
            return Err(SessionError::EmptyExerciseSet);
        }
        let mut seen = HashSet::with_capacity(exercises.len());
        if let Some(duplicate) = exercises
            .iter()
            .map(Exercise::id)
            .find(|id| !seen.insert(*id))
        {
            warn!(
                lesson_id = %lesson.id(),
                exercise_id = %duplicate,
                "refusing duplicate exercise ids"
            );
            return Err(SessionError::DuplicateExercise(duplicate));
        }
        if let Some(previous) = &self.session {
            debug!(lesson_id = %previous.lesson.id(), "replacing active session");
        }

        info!(
            lesson_id = %lesson.id(),
            exercises = exercises.len(),
            max_hearts,
            tier = %self.tier,
            "lesson started"
        );
        self.session = Some(LessonSession {
            lesson,
            exercises,
            cursor: 0,
            tally: AnswerTally::default(),
            max_hearts,
            hearts_remaining: max_hearts,
            tier: self.tier,
            started_at: self.clock.now(),
            answers: HashMap::new(),
        });
        Ok(())
    }

    /// Grade an answer for the current exercise.
    ///
    /// The cursor does not move. Submitting again for the same exercise
    /// replaces its earlier verdict in the counters; an incorrect resubmission
    /// still costs a heart.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when idle and
    /// `SessionError::ExerciseMismatch` when `exercise_id` is not the current
    /// exercise.
    pub fn submit_answer(
        &mut self,
        exercise_id: ExerciseId,
        answer: Answer,
    ) -> Result<Verdict, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let current = session.current_exercise();
        if current.id() != exercise_id {
            warn!(expected = %current.id(), got = %exercise_id, "answer for wrong exercise");
            return Err(SessionError::ExerciseMismatch {
                expected: current.id(),
                got: exercise_id,
            });
        }

        let spec = current.answer();
        let correct = grading::validate(spec, &answer);
        let correct_answer = spec.correct().clone();

        let previous = session
            .answers
            .insert(exercise_id, RecordedAnswer { answer, correct });
        if let Some(previous) = &previous {
            // undo the earlier verdict so each exercise counts once
            if previous.correct {
                session.tally.correct = session.tally.correct.saturating_sub(1);
            } else {
                session.tally.incorrect = session.tally.incorrect.saturating_sub(1);
            }
        }
        session.tally.record(correct);

        let charge = hearts::charge(session.hearts_remaining, correct);
        session.hearts_remaining = charge.hearts_remaining;
        let out_of_hearts = session.out_of_hearts();

        debug!(
            exercise_id = %exercise_id,
            correct,
            resubmission = previous.is_some(),
            hearts_remaining = session.hearts_remaining,
            "answer graded"
        );
        if out_of_hearts {
            info!(lesson_id = %session.lesson.id(), "out of hearts");
        }

        Ok(Verdict {
            correct,
            correct_answer,
            hearts_remaining: session.hearts_remaining,
            heart_deducted: charge.deduction_reported,
            out_of_hearts,
        })
    }

    /// Advance to the next exercise.
    ///
    /// Returns `false` and leaves the cursor in place once the last exercise
    /// is current. Hearts are not consulted; check `Verdict::out_of_hearts`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when idle.
    pub fn next_exercise(&mut self) -> Result<bool, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        if session.is_last_exercise() {
            debug!(cursor = session.cursor, "no exercises left");
            return Ok(false);
        }
        session.cursor += 1;
        debug!(cursor = session.cursor, "advanced");
        Ok(true)
    }

    /// Build the completion summary. Does not end the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveSession` when idle.
    pub fn complete_lesson(&self) -> Result<LessonSummary, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoActiveSession)?;
        let total_exercises = u32::try_from(session.exercises.len()).unwrap_or(u32::MAX);
        let summary = scoring::summarize(
            ScoreInput {
                lesson: &session.lesson,
                tally: session.tally,
                total_exercises,
                hearts_lost: session.hearts_lost(),
                started_at: session.started_at,
                completed_at: self.clock.now(),
            },
            &self.rewards,
        );
        info!(
            lesson_id = %summary.lesson_id,
            xp = summary.xp_earned,
            accuracy = summary.accuracy,
            perfect = summary.is_perfect,
            "lesson completed"
        );
        Ok(summary)
    }

    /// Drop the current session, if any.
    pub fn reset_lesson(&mut self) {
        if let Some(session) = self.session.take() {
            info!(lesson_id = %session.lesson.id(), "lesson reset");
        }
    }

    //
    // ─── READ ACCESS ───────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn session(&self) -> Option<&LessonSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.session
            .as_ref()
            .map_or(EngineState::Idle, LessonSession::state)
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.session.as_ref().map(LessonSession::current_exercise)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let Some(session) = &self.session else {
            return SessionProgress::idle();
        };
        SessionProgress {
            position: session.cursor + 1,
            total: session.exercises.len(),
            answered: session.tally.answered(),
            correct: session.tally.correct,
            incorrect: session.tally.incorrect,
            hearts_remaining: session.hearts_remaining,
            state: session.state(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
