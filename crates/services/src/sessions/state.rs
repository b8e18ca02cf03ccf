use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;

use learn_core::hearts;
use learn_core::model::{Answer, Exercise, ExerciseId, Lesson, SubscriptionTier};
use learn_core::scoring::AnswerTally;

//
// ─── ENGINE STATE ──────────────────────────────────────────────────────────────
//

/// Lifecycle position of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No lesson started, or the last one was reset.
    Idle,
    /// Exercises remain and the learner may keep answering.
    Active,
    /// The last exercise has been answered, or a free-tier learner ran out of
    /// hearts. The caller should complete the lesson.
    Exhausted,
}

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// Canonical answer, for feedback display.
    pub correct_answer: Answer,
    pub hearts_remaining: u32,
    /// The profile store should be asked to deduct one heart.
    pub heart_deducted: bool,
    /// Free-tier learner hit zero hearts: complete instead of advancing.
    pub out_of_hearts: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedAnswer {
    pub(crate) answer: Answer,
    pub(crate) correct: bool,
}

/// State of one in-progress lesson. Only `LessonEngine` mutates it.
pub struct LessonSession {
    pub(crate) lesson: Lesson,
    pub(crate) exercises: Vec<Exercise>,
    pub(crate) cursor: usize,
    pub(crate) tally: AnswerTally,
    pub(crate) max_hearts: u32,
    pub(crate) hearts_remaining: u32,
    pub(crate) tier: SubscriptionTier,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) answers: HashMap<ExerciseId, RecordedAnswer>,
}

impl LessonSession {
    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Zero-based index of the current exercise.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_exercise(&self) -> &Exercise {
        // cursor is kept in bounds and the list is never empty
        &self.exercises[self.cursor]
    }

    #[must_use]
    pub fn total_exercises(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.tally.correct
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.tally.incorrect
    }

    #[must_use]
    pub fn hearts_remaining(&self) -> u32 {
        self.hearts_remaining
    }

    #[must_use]
    pub fn max_hearts(&self) -> u32 {
        self.max_hearts
    }

    /// Hearts taken by this session's own counter.
    #[must_use]
    pub fn hearts_lost(&self) -> u32 {
        self.max_hearts.saturating_sub(self.hearts_remaining)
    }

    #[must_use]
    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The last answer submitted for an exercise, if any.
    #[must_use]
    pub fn answer_for(&self, exercise_id: ExerciseId) -> Option<&Answer> {
        self.answers.get(&exercise_id).map(|recorded| &recorded.answer)
    }

    #[must_use]
    pub fn is_last_exercise(&self) -> bool {
        self.cursor + 1 >= self.exercises.len()
    }

    #[must_use]
    pub fn out_of_hearts(&self) -> bool {
        hearts::must_end_session(self.hearts_remaining, self.tier)
    }

    pub(crate) fn state(&self) -> EngineState {
        let finished = self.is_last_exercise()
            && self.answers.contains_key(&self.current_exercise().id());
        if finished || self.out_of_hearts() {
            EngineState::Exhausted
        } else {
            EngineState::Active
        }
    }
}

impl fmt::Debug for LessonSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonSession")
            .field("lesson_id", &self.lesson.id())
            .field("exercises_len", &self.exercises.len())
            .field("cursor", &self.cursor)
            .field("tally", &self.tally)
            .field("hearts_remaining", &self.hearts_remaining)
            .field("tier", &self.tier)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
