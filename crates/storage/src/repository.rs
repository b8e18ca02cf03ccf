use async_trait::async_trait;
use learn_core::model::{Exercise, LearnerProfile, Lesson, LessonId, UnitId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read side of the content catalogue, plus the upserts used to seed it.
#[async_trait]
pub trait LessonCatalog: Send + Sync {
    /// Persist or replace a lesson definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Persist or replace an exercise definition.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the exercise cannot be stored.
    async fn upsert_exercise(&self, exercise: &Exercise) -> Result<(), StorageError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails; a missing lesson is `Ok(None)`.
    async fn lesson_by_id(&self, id: LessonId) -> Result<Option<Lesson>, StorageError>;

    /// Lessons of a unit, ordered by their order index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    async fn lessons_by_unit(&self, unit_id: UnitId) -> Result<Vec<Lesson>, StorageError>;

    /// Exercises of a lesson, ordered by their order index.
    ///
    /// An empty list means the lesson is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    async fn exercises_for_lesson(&self, lesson_id: LessonId)
    -> Result<Vec<Exercise>, StorageError>;
}

/// Storage for the single active learner's balances.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be read.
    async fn load_profile(&self) -> Result<LearnerProfile, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be written.
    async fn save_profile(&self, profile: &LearnerProfile) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    lessons: Arc<Mutex<HashMap<LessonId, Lesson>>>,
    exercises: Arc<Mutex<HashMap<LessonId, Vec<Exercise>>>>,
    profile: Arc<Mutex<LearnerProfile>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_profile(profile: LearnerProfile) -> Self {
        Self {
            profile: Arc::new(Mutex::new(profile)),
            ..Self::default()
        }
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Connection(err.to_string())
}

#[async_trait]
impl LessonCatalog for InMemoryRepository {
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = self.lessons.lock().map_err(poisoned)?;
        guard.insert(lesson.id(), lesson.clone());
        Ok(())
    }

    async fn upsert_exercise(&self, exercise: &Exercise) -> Result<(), StorageError> {
        let mut guard = self.exercises.lock().map_err(poisoned)?;
        let list = guard.entry(exercise.lesson_id()).or_default();
        match list.iter_mut().find(|e| e.id() == exercise.id()) {
            Some(existing) => *existing = exercise.clone(),
            None => list.push(exercise.clone()),
        }
        Ok(())
    }

    async fn lesson_by_id(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn lessons_by_unit(&self, unit_id: UnitId) -> Result<Vec<Lesson>, StorageError> {
        let guard = self.lessons.lock().map_err(poisoned)?;
        let mut lessons: Vec<Lesson> = guard
            .values()
            .filter(|lesson| lesson.unit_id() == unit_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|lesson| (lesson.order_index(), lesson.id()));
        Ok(lessons)
    }

    async fn exercises_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<Exercise>, StorageError> {
        let guard = self.exercises.lock().map_err(poisoned)?;
        let mut exercises = guard.get(&lesson_id).cloned().unwrap_or_default();
        exercises.sort_by_key(|exercise| (exercise.order_index(), exercise.id()));
        Ok(exercises)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn load_profile(&self) -> Result<LearnerProfile, StorageError> {
        let guard = self.profile.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    async fn save_profile(&self, profile: &LearnerProfile) -> Result<(), StorageError> {
        let mut guard = self.profile.lock().map_err(poisoned)?;
        *guard = profile.clone();
        Ok(())
    }
}

/// Aggregates catalogue and profile repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn LessonCatalog>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let catalog: Arc<dyn LessonCatalog> = Arc::new(repo.clone());
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo);
        Self { catalog, profiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{
        Answer, AnswerSpec, ExerciseId, ExerciseType, LessonType, QuestionData, SubscriptionTier,
    };

    fn build_exercise(id: u64, lesson_id: LessonId, order: u32) -> Exercise {
        Exercise::new(
            ExerciseId::new(id),
            lesson_id,
            ExerciseType::TranslateToTarget,
            QuestionData::default(),
            AnswerSpec::new(Answer::scalar(format!("A{id}"))),
        )
        .unwrap()
        .with_order_index(order)
    }

    #[tokio::test]
    async fn exercises_come_back_in_order() {
        let repo = InMemoryRepository::new();
        let lesson_id = LessonId::new(1);
        for (id, order) in [(10, 2), (11, 0), (12, 1)] {
            repo.upsert_exercise(&build_exercise(id, lesson_id, order))
                .await
                .unwrap();
        }

        let ids: Vec<u64> = repo
            .exercises_for_lesson(lesson_id)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id().value())
            .collect();
        assert_eq!(ids, vec![11, 12, 10]);
    }

    #[tokio::test]
    async fn upsert_replaces_exercise_with_same_id() {
        let repo = InMemoryRepository::new();
        let lesson_id = LessonId::new(1);
        repo.upsert_exercise(&build_exercise(1, lesson_id, 0)).await.unwrap();
        repo.upsert_exercise(&build_exercise(1, lesson_id, 5)).await.unwrap();

        let exercises = repo.exercises_for_lesson(lesson_id).await.unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].order_index(), 5);
    }

    #[tokio::test]
    async fn unknown_lesson_has_no_exercises() {
        let repo = InMemoryRepository::new();
        assert!(repo.lesson_by_id(LessonId::new(42)).await.unwrap().is_none());
        assert!(repo.exercises_for_lesson(LessonId::new(42)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lessons_filter_by_unit() {
        let repo = InMemoryRepository::new();
        let unit = UnitId::new(1);
        for (id, order) in [(1, 1), (2, 0)] {
            let lesson = Lesson::new(LessonId::new(id), unit, LessonType::Standard, 10)
                .with_order_index(order);
            repo.upsert_lesson(&lesson).await.unwrap();
        }
        let other = Lesson::new(LessonId::new(3), UnitId::new(2), LessonType::Review, 10);
        repo.upsert_lesson(&other).await.unwrap();

        let ids: Vec<u64> = repo
            .lessons_by_unit(unit)
            .await
            .unwrap()
            .iter()
            .map(|l| l.id().value())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn profile_round_trips() {
        let repo = InMemoryRepository::new();
        let mut profile = repo.load_profile().await.unwrap();
        profile.add_xp(15);
        profile.set_tier(SubscriptionTier::Max);
        repo.save_profile(&profile).await.unwrap();

        let loaded = repo.load_profile().await.unwrap();
        assert_eq!(loaded.total_xp(), 15);
        assert_eq!(loaded.tier(), SubscriptionTier::Max);
    }
}
