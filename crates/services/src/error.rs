//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::model::{ExerciseId, ExerciseType, LessonId};
use storage::repository::StorageError;

/// Errors emitted by the lesson engine and the lesson loop.
///
/// Every variant is a contract violation by the caller or a storage failure;
/// nothing here is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no active lesson session")]
    NoActiveSession,
    #[error("answer submitted for exercise {got}, but the current exercise is {expected}")]
    ExerciseMismatch {
        expected: ExerciseId,
        got: ExerciseId,
    },
    #[error("cannot start a lesson without exercises")]
    EmptyExerciseSet,
    #[error("exercise {0} appears more than once in the lesson")]
    DuplicateExercise(ExerciseId),
    #[error("lesson {0} is unavailable")]
    LessonUnavailable(LessonId),
    #[error("no hearts left to start a lesson")]
    OutOfHearts,
    #[error(transparent)]
    Profile(#[from] ProfileServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProfileService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised while turning a learner gesture into an answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdapterError {
    #[error("exercise type not implemented: {0}")]
    Unsupported(ExerciseType),
    #[error("{gesture} gesture does not apply to {exercise_type} exercises")]
    GestureMismatch {
        exercise_type: ExerciseType,
        gesture: &'static str,
    },
    #[error("answer is empty")]
    EmptyInput,
    #[error("no option with id {0}")]
    UnknownOption(String),
    #[error("word {0:?} is not available in the word bank")]
    UnknownTile(String),
    #[error("{left:?} and {right:?} are not a pair")]
    NotAPair { left: String, right: String },
    #[error("{matched} of {total} pairs matched")]
    IncompleteMatching { matched: usize, total: usize },
}
