mod answer;
mod exercise;
mod ids;
mod lesson;
mod profile;
mod rewards;
mod summary;

pub use answer::{Answer, AnswerSpec};
pub use exercise::{ChoiceOption, Exercise, ExerciseError, ExerciseType, MatchPair, QuestionData};
pub use ids::{ExerciseId, LessonId, ParseIdError, UnitId};
pub use lesson::{Lesson, LessonError, LessonType};
pub use profile::{
    DEFAULT_HEARTS_MAX, LearnerProfile, ProfileError, STARTING_GEMS, Streak, SubscriptionTier,
};
pub use rewards::{RewardSettings, RewardSettingsError};
pub use summary::{LessonSummary, RewardDelta};
