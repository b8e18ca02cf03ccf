//! End-of-lesson scoring: accuracy, perfect-run bonus and XP.

use chrono::{DateTime, Utc};

use crate::model::{Lesson, LessonSummary, RewardSettings};

/// Running correct/incorrect counts for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerTally {
    pub correct: u32,
    pub incorrect: u32,
}

impl AnswerTally {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
        }
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct.saturating_add(self.incorrect)
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.incorrect == 0
    }
}

/// `round(100 * correct / total)` with halves rounded up. Zero when `total`
/// is zero.
#[must_use]
pub fn accuracy_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct);
    let total = u64::from(total);
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// XP for a finished lesson: the lesson reward, plus the bonus on a perfect run.
#[must_use]
pub fn xp_earned(lesson: &Lesson, is_perfect: bool, settings: &RewardSettings) -> u32 {
    if is_perfect {
        lesson.xp_reward().saturating_add(settings.perfect_bonus_xp())
    } else {
        lesson.xp_reward()
    }
}

/// Everything the score calculator needs from a session.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub lesson: &'a Lesson,
    pub tally: AnswerTally,
    pub total_exercises: u32,
    pub hearts_lost: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Build the completion summary.
#[must_use]
pub fn summarize(input: ScoreInput<'_>, settings: &RewardSettings) -> LessonSummary {
    let is_perfect = input.tally.is_perfect();
    LessonSummary {
        lesson_id: input.lesson.id(),
        xp_earned: xp_earned(input.lesson, is_perfect, settings),
        accuracy: accuracy_percent(input.tally.correct, input.total_exercises),
        is_perfect,
        correct: input.tally.correct,
        incorrect: input.tally.incorrect,
        total_exercises: input.total_exercises,
        hearts_lost: input.hearts_lost,
        started_at: input.started_at,
        completed_at: input.completed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LessonId, LessonType, UnitId};
    use crate::time::fixed_now;

    fn lesson(xp: u32) -> Lesson {
        Lesson::new(LessonId::new(1), UnitId::new(1), LessonType::Standard, xp)
    }

    fn input(lesson: &Lesson, correct: u32, incorrect: u32, total: u32) -> ScoreInput<'_> {
        ScoreInput {
            lesson,
            tally: AnswerTally { correct, incorrect },
            total_exercises: total,
            hearts_lost: incorrect,
            started_at: fixed_now(),
            completed_at: fixed_now(),
        }
    }

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(3, 4), 75);
        assert_eq!(accuracy_percent(1, 2), 50);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(1, 8), 13);
        assert_eq!(accuracy_percent(7, 7), 100);
        assert_eq!(accuracy_percent(0, 5), 0);
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn perfect_run_adds_bonus() {
        let lesson = lesson(10);
        let summary = summarize(input(&lesson, 4, 0, 4), &RewardSettings::default());
        assert_eq!(summary.xp_earned, 15);
        assert_eq!(summary.accuracy, 100);
        assert!(summary.is_perfect);
    }

    #[test]
    fn one_miss_drops_bonus() {
        let lesson = lesson(10);
        let summary = summarize(input(&lesson, 3, 1, 4), &RewardSettings::default());
        assert_eq!(summary.xp_earned, 10);
        assert_eq!(summary.accuracy, 75);
        assert!(!summary.is_perfect);
    }

    #[test]
    fn unanswered_lesson_is_perfect_but_zero_accuracy() {
        // perfection only looks at the incorrect count
        let lesson = lesson(10);
        let summary = summarize(input(&lesson, 0, 0, 3), &RewardSettings::default());
        assert!(summary.is_perfect);
        assert_eq!(summary.accuracy, 0);
        assert_eq!(summary.xp_earned, 15);
    }

    #[test]
    fn tally_counts_both_outcomes() {
        let mut tally = AnswerTally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        assert_eq!(tally, AnswerTally { correct: 2, incorrect: 1 });
        assert_eq!(tally.answered(), 3);
        assert!(!tally.is_perfect());
    }
}
