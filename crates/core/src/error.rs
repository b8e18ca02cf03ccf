use thiserror::Error;

use crate::model::{ExerciseError, LessonError, ProfileError, RewardSettingsError};

/// Any validation failure raised while building domain values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Exercise(#[from] ExerciseError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    RewardSettings(#[from] RewardSettingsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LearnerProfile, Lesson, LessonId, LessonType, SubscriptionTier, UnitId};

    fn build() -> Result<(Lesson, LearnerProfile), Error> {
        let lesson = Lesson::new(LessonId::new(1), UnitId::new(1), LessonType::Standard, 10)
            .with_title("Greetings")?;
        let profile = LearnerProfile::from_persisted(0, 0, 6, 5, SubscriptionTier::Free)?;
        Ok((lesson, profile))
    }

    #[test]
    fn domain_errors_convert_with_question_mark() {
        let err = build().unwrap_err();
        assert!(matches!(
            err,
            Error::Profile(ProfileError::HeartsOverCapacity { hearts: 6, max: 5 })
        ));
    }
}
