//! JSON course files: the on-disk shape of catalogue content.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use learn_core::model::{
    AnswerSpec, Exercise, ExerciseError, ExerciseId, ExerciseType, Lesson, LessonError, LessonId,
    LessonType, QuestionData, UnitId,
};

use crate::repository::{LessonCatalog, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseError {
    #[error("failed to read course file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid course JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lesson {id}: {source}")]
    Lesson { id: LessonId, source: LessonError },
    #[error("exercise {id}: {source}")]
    Exercise { id: ExerciseId, source: ExerciseError },
    #[error("exercise {exercise} refers to unknown lesson {lesson}")]
    OrphanExercise { exercise: ExerciseId, lesson: LessonId },
    #[error("duplicate exercise id {0}")]
    DuplicateExercise(ExerciseId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persisted shape for a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: LessonId,
    pub unit_id: UnitId,
    #[serde(default)]
    pub lesson_type: LessonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub order_index: u32,
    pub xp_reward: u32,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub estimated_minutes: u32,
}

impl LessonRecord {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id(),
            unit_id: lesson.unit_id(),
            lesson_type: lesson.lesson_type(),
            title: lesson.title().map(str::to_owned),
            order_index: lesson.order_index(),
            xp_reward: lesson.xp_reward(),
            is_legendary: lesson.is_legendary(),
            estimated_minutes: lesson.estimated_minutes(),
        }
    }

    /// Convert the record back into a domain `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title is blank.
    pub fn into_lesson(self) -> Result<Lesson, LessonError> {
        let mut lesson = Lesson::new(self.id, self.unit_id, self.lesson_type, self.xp_reward)
            .with_order_index(self.order_index)
            .with_legendary(self.is_legendary || self.lesson_type == LessonType::Legendary)
            .with_estimated_minutes(self.estimated_minutes);
        if let Some(title) = self.title {
            lesson = lesson.with_title(title)?;
        }
        Ok(lesson)
    }
}

fn default_difficulty() -> u8 {
    1
}

/// Persisted shape for an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: ExerciseId,
    pub lesson_id: LessonId,
    pub exercise_type: ExerciseType,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub question: QuestionData,
    pub answer: AnswerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

impl ExerciseRecord {
    #[must_use]
    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id(),
            lesson_id: exercise.lesson_id(),
            exercise_type: exercise.exercise_type(),
            order_index: exercise.order_index(),
            question: exercise.question().clone(),
            answer: exercise.answer().clone(),
            hint: exercise.hint().map(str::to_owned),
            explanation: exercise.explanation().map(str::to_owned),
            difficulty: exercise.difficulty(),
        }
    }

    /// Convert the record back into a domain `Exercise`.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError` if the payload does not fit the exercise type.
    pub fn into_exercise(self) -> Result<Exercise, ExerciseError> {
        let mut exercise = Exercise::new(
            self.id,
            self.lesson_id,
            self.exercise_type,
            self.question,
            self.answer,
        )?
        .with_order_index(self.order_index)
        .with_difficulty(self.difficulty);
        if let Some(hint) = self.hint {
            exercise = exercise.with_hint(hint);
        }
        if let Some(explanation) = self.explanation {
            exercise = exercise.with_explanation(explanation);
        }
        Ok(exercise)
    }
}

/// A whole course: lessons and their exercises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseFile {
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
    #[serde(default)]
    pub exercises: Vec<ExerciseRecord>,
}

impl CourseFile {
    /// Parse a course from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::Json` on malformed input.
    pub fn from_json(raw: &str) -> Result<Self, CourseError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a course file.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::Io` or `CourseError::Json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CourseError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, CourseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every record and convert to domain values.
    ///
    /// # Errors
    ///
    /// Returns the first invalid lesson or exercise, an exercise pointing at a
    /// lesson not in the file, or a repeated exercise id.
    pub fn into_domain(self) -> Result<(Vec<Lesson>, Vec<Exercise>), CourseError> {
        let mut lessons = Vec::with_capacity(self.lessons.len());
        for record in self.lessons {
            let id = record.id;
            lessons.push(
                record
                    .into_lesson()
                    .map_err(|source| CourseError::Lesson { id, source })?,
            );
        }

        let known: HashSet<LessonId> = lessons.iter().map(Lesson::id).collect();
        let mut seen = HashSet::new();
        let mut exercises = Vec::with_capacity(self.exercises.len());
        for record in self.exercises {
            let id = record.id;
            if !known.contains(&record.lesson_id) {
                return Err(CourseError::OrphanExercise {
                    exercise: id,
                    lesson: record.lesson_id,
                });
            }
            if !seen.insert(id) {
                return Err(CourseError::DuplicateExercise(id));
            }
            exercises.push(
                record
                    .into_exercise()
                    .map_err(|source| CourseError::Exercise { id, source })?,
            );
        }

        Ok((lessons, exercises))
    }

    /// Validate the course and upsert it into a catalogue.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` for invalid content or storage failures.
    pub async fn import_into(self, catalog: &dyn LessonCatalog) -> Result<usize, CourseError> {
        let (lessons, exercises) = self.into_domain()?;
        for lesson in &lessons {
            catalog.upsert_lesson(lesson).await?;
        }
        for exercise in &exercises {
            catalog.upsert_exercise(exercise).await?;
        }
        Ok(lessons.len())
    }
}
