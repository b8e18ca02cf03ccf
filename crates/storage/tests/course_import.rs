use learn_core::model::{Answer, ExerciseType, LessonId};
use storage::repository::{InMemoryRepository, LessonCatalog};
use storage::sample::{BASICS_UNIT, FIRST_LESSON, sample_course};
use storage::{CourseFile, Storage};

#[tokio::test]
async fn sample_course_imports_into_catalog() {
    let repo = InMemoryRepository::new();
    let imported = sample_course().import_into(&repo).await.unwrap();
    assert_eq!(imported, 5);

    let lessons = repo.lessons_by_unit(BASICS_UNIT).await.unwrap();
    let titles: Vec<_> = lessons.iter().filter_map(|l| l.title()).collect();
    assert_eq!(titles, ["Lesson 1", "Lesson 2", "Lesson 3", "Lesson 4", "Lesson 5"]);

    let exercises = repo.exercises_for_lesson(FIRST_LESSON).await.unwrap();
    assert_eq!(exercises.len(), 7);
    assert_eq!(exercises[4].exercise_type(), ExerciseType::MatchPairs);
    assert_eq!(
        exercises[4].answer().correct(),
        &Answer::sequence(["1", "2", "3", "4"])
    );
}

#[tokio::test]
async fn json_round_trip_preserves_course() {
    let course = sample_course();
    let json = course.to_json_pretty().unwrap();
    let parsed = CourseFile::from_json(&json).unwrap();
    assert_eq!(parsed, course);

    let storage = Storage::in_memory();
    parsed.import_into(storage.catalog.as_ref()).await.unwrap();
    let lesson = storage
        .catalog
        .lesson_by_id(LessonId::new(3))
        .await
        .unwrap()
        .expect("lesson 3 imported");
    assert_eq!(lesson.xp_reward(), 10);
    assert_eq!(
        storage
            .catalog
            .exercises_for_lesson(lesson.id())
            .await
            .unwrap()
            .len(),
        7
    );
}
