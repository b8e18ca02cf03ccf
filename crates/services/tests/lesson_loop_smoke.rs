use std::sync::Arc;

use learn_core::model::{
    Answer, LearnerProfile, Lesson, LessonId, LessonType, STARTING_GEMS, SubscriptionTier, UnitId,
};
use learn_core::time::fixed_now;
use services::{Clock, EngineState, LessonLoopService, LessonStep, SessionError};
use storage::repository::{InMemoryRepository, LessonCatalog, ProfileRepository};
use storage::sample::{FIRST_LESSON, sample_course};

async fn seeded(profile: LearnerProfile) -> (InMemoryRepository, LessonLoopService) {
    let repo = InMemoryRepository::with_profile(profile);
    sample_course().import_into(&repo).await.unwrap();
    let loop_svc = LessonLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );
    (repo, loop_svc)
}

#[tokio::test]
async fn perfect_lesson_credits_profile() {
    let (repo, loop_svc) = seeded(LearnerProfile::new()).await;
    let mut engine = loop_svc.engine();
    loop_svc.start_lesson(&mut engine, FIRST_LESSON).await.unwrap();

    let outcome = loop {
        let canonical = engine.current_exercise().unwrap().answer().correct().clone();
        let result = loop_svc.answer(&mut engine, canonical).await.unwrap();
        assert!(result.verdict.correct);
        match loop_svc.advance(&mut engine).await.unwrap() {
            LessonStep::Next => continue,
            LessonStep::Finished(outcome) => break outcome,
        }
    };

    assert_eq!(outcome.summary.total_exercises, 7);
    assert_eq!(outcome.summary.xp_earned, 15);
    assert!(outcome.summary.is_perfect);
    assert!(!outcome.ended_early);
    assert_eq!(engine.state(), EngineState::Idle);

    let profile = repo.load_profile().await.unwrap();
    assert_eq!(profile.total_xp(), 15);
    assert_eq!(profile.gems(), STARTING_GEMS + 2);
    assert_eq!(profile.hearts(), 5);
    assert_eq!(profile.streak().current, 1);
}

#[tokio::test]
async fn running_out_of_hearts_ends_without_rewards() {
    let profile = LearnerProfile::from_persisted(0, STARTING_GEMS, 1, 5, SubscriptionTier::Free)
        .unwrap();
    let (repo, loop_svc) = seeded(profile).await;
    let mut engine = loop_svc.engine();
    loop_svc.start_lesson(&mut engine, FIRST_LESSON).await.unwrap();

    let result = loop_svc
        .answer(&mut engine, Answer::scalar("definitely wrong"))
        .await
        .unwrap();
    assert!(result.heart_applied);
    assert!(result.verdict.out_of_hearts);

    let LessonStep::Finished(outcome) = loop_svc.advance(&mut engine).await.unwrap() else {
        panic!("lesson should end once hearts run out");
    };
    assert!(outcome.ended_early);
    assert_eq!(outcome.rewards, None);
    assert_eq!(outcome.summary.incorrect, 1);

    let profile = repo.load_profile().await.unwrap();
    assert_eq!(profile.hearts(), 0);
    assert_eq!(profile.total_xp(), 0);
    assert_eq!(profile.gems(), STARTING_GEMS);

    let err = loop_svc
        .start_lesson(&mut engine, FIRST_LESSON)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::OutOfHearts));
}

#[tokio::test]
async fn premium_learner_keeps_hearts() {
    let (repo, loop_svc) = seeded(LearnerProfile::new().with_tier(SubscriptionTier::Super)).await;
    let mut engine = loop_svc.engine();
    loop_svc.start_lesson(&mut engine, FIRST_LESSON).await.unwrap();
    assert_eq!(engine.tier(), SubscriptionTier::Super);

    let result = loop_svc
        .answer(&mut engine, Answer::scalar("wrong"))
        .await
        .unwrap();
    assert!(result.verdict.heart_deducted);
    assert!(!result.heart_applied);
    assert_eq!(repo.load_profile().await.unwrap().hearts(), 5);
    assert!(matches!(
        loop_svc.advance(&mut engine).await.unwrap(),
        LessonStep::Next
    ));
}

#[tokio::test]
async fn unavailable_lessons_do_not_start() {
    let (repo, loop_svc) = seeded(LearnerProfile::new()).await;
    let mut engine = loop_svc.engine();

    let missing = loop_svc
        .start_lesson(&mut engine, LessonId::new(99))
        .await
        .unwrap_err();
    assert!(matches!(missing, SessionError::LessonUnavailable(id) if id == LessonId::new(99)));

    let empty = Lesson::new(LessonId::new(50), UnitId::new(2), LessonType::Story, 10);
    repo.upsert_lesson(&empty).await.unwrap();
    let err = loop_svc
        .start_lesson(&mut engine, empty.id())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::LessonUnavailable(_)));
    assert_eq!(engine.state(), EngineState::Idle);
}

#[tokio::test]
async fn quitting_resets_the_engine() {
    let (_repo, loop_svc) = seeded(LearnerProfile::new()).await;
    let mut engine = loop_svc.engine();
    loop_svc.start_lesson(&mut engine, FIRST_LESSON).await.unwrap();
    loop_svc.quit(&mut engine);
    assert_eq!(engine.state(), EngineState::Idle);
    assert!(matches!(
        loop_svc.advance(&mut engine).await.unwrap_err(),
        SessionError::NoActiveSession
    ));
}
