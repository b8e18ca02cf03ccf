//! Built-in Spanish starter course, used when no course file is supplied.

use learn_core::model::{
    Answer, AnswerSpec, ChoiceOption, ExerciseId, ExerciseType, LessonId, LessonType, MatchPair,
    QuestionData, UnitId,
};

use crate::course::{CourseFile, ExerciseRecord, LessonRecord};

/// Unit holding the starter lessons.
pub const BASICS_UNIT: UnitId = UnitId::new(1);

/// The hand-written first lesson; the others are filler drills.
pub const FIRST_LESSON: LessonId = LessonId::new(1);

const LESSON_COUNT: u64 = 5;
const DRILL_EXERCISES: u32 = 7;

fn options(texts: &[&str]) -> Vec<ChoiceOption> {
    ["a", "b", "c", "d"]
        .iter()
        .zip(texts)
        .map(|(id, text)| ChoiceOption::new(*id, *text))
        .collect()
}

fn record(
    id: u64,
    lesson_id: LessonId,
    exercise_type: ExerciseType,
    order_index: u32,
    question: QuestionData,
    answer: AnswerSpec,
) -> ExerciseRecord {
    ExerciseRecord {
        id: ExerciseId::new(id),
        lesson_id,
        exercise_type,
        order_index,
        question,
        answer,
        hint: None,
        explanation: None,
        difficulty: 1,
    }
}

fn first_lesson_exercises() -> Vec<ExerciseRecord> {
    let lesson = FIRST_LESSON;
    let pairs = vec![
        MatchPair::new("1", "Manzana", "Apple"),
        MatchPair::new("2", "Niño", "Boy"),
        MatchPair::new("3", "Come", "Eats"),
        MatchPair::new("4", "Hola", "Hello"),
    ];

    vec![
        ExerciseRecord {
            hint: Some("Manzana is a common fruit".into()),
            ..record(
                101,
                lesson,
                ExerciseType::MultipleChoice,
                0,
                QuestionData {
                    question: Some("Which of these means \"apple\" in Spanish?".into()),
                    options: options(&["Manzana", "Naranja", "Plátano", "Uva"]),
                    ..QuestionData::default()
                },
                AnswerSpec::new(Answer::scalar("a")),
            )
        },
        ExerciseRecord {
            hint: Some("Remember: \"El\" = The (masculine), \"niño\" = boy".into()),
            ..record(
                102,
                lesson,
                ExerciseType::WordBank,
                1,
                QuestionData {
                    source_text: Some("The boy eats an apple".into()),
                    word_bank: ["El", "niño", "come", "una", "manzana", "la", "niña", "bebe"]
                        .map(String::from)
                        .to_vec(),
                    ..QuestionData::default()
                },
                AnswerSpec::new(Answer::sequence(["El", "niño", "come", "una", "manzana"])),
            )
        },
        ExerciseRecord {
            hint: Some("It is a common greeting".into()),
            ..record(
                103,
                lesson,
                ExerciseType::TranslateToTarget,
                2,
                QuestionData {
                    source_text: Some("Hello".into()),
                    ..QuestionData::default()
                },
                AnswerSpec::new(Answer::scalar("Hola")).with_acceptable(["¡Hola!"]),
            )
        },
        ExerciseRecord {
            hint: Some("A greeting used in the morning".into()),
            ..record(
                104,
                lesson,
                ExerciseType::TranslateToSource,
                3,
                QuestionData {
                    target_text: Some("Buenos días".into()),
                    ..QuestionData::default()
                },
                AnswerSpec::new(Answer::scalar("Good morning")).with_acceptable(["Good day"]),
            )
        },
        record(
            105,
            lesson,
            ExerciseType::MatchPairs,
            4,
            QuestionData {
                pairs,
                ..QuestionData::default()
            },
            AnswerSpec::new(Answer::sequence(["1", "2", "3", "4"])),
        ),
        ExerciseRecord {
            hint: Some("Niño is masculine".into()),
            explanation: Some("Use \"El\" for masculine nouns like \"niño\"".into()),
            difficulty: 2,
            ..record(
                106,
                lesson,
                ExerciseType::FillBlank,
                5,
                QuestionData {
                    question: Some("___ niño come una manzana.".into()),
                    options: options(&["El", "La", "Un", "Una"]),
                    ..QuestionData::default()
                },
                AnswerSpec::new(Answer::scalar("a")),
            )
        },
        ExerciseRecord {
            hint: Some("A greeting with good morning".into()),
            difficulty: 2,
            ..record(
                107,
                lesson,
                ExerciseType::ListenAndType,
                6,
                QuestionData {
                    audio_ref: Some("/audio/hola-buenos-dias.mp3".into()),
                    ..QuestionData::default()
                },
                AnswerSpec::new(Answer::scalar("Hola, buenos días"))
                    .with_acceptable(["Hola buenos días"]),
            )
        },
    ]
}

/// Alternating multiple-choice / word-bank drills for lessons without
/// hand-written content.
fn drill_exercises(lesson_id: LessonId) -> Vec<ExerciseRecord> {
    (0..DRILL_EXERCISES)
        .map(|index| {
            let id = lesson_id.value() * 100 + u64::from(index) + 1;
            if index % 2 == 0 {
                record(
                    id,
                    lesson_id,
                    ExerciseType::MultipleChoice,
                    index,
                    QuestionData {
                        question: Some("Select the correct translation".into()),
                        options: options(&["Option A", "Option B", "Option C", "Option D"]),
                        ..QuestionData::default()
                    },
                    AnswerSpec::new(Answer::scalar("a")),
                )
            } else {
                ExerciseRecord {
                    difficulty: 2,
                    ..record(
                        id,
                        lesson_id,
                        ExerciseType::WordBank,
                        index,
                        QuestionData {
                            source_text: Some("Sample sentence".into()),
                            word_bank: ["Word1", "Word2", "Word3", "Word4", "Word5"]
                                .map(String::from)
                                .to_vec(),
                            ..QuestionData::default()
                        },
                        AnswerSpec::new(Answer::sequence(["Word1", "Word2"])),
                    )
                }
            }
        })
        .collect()
}

/// The starter course: five standard lessons worth 10 XP each.
#[must_use]
pub fn sample_course() -> CourseFile {
    let mut course = CourseFile::default();
    for n in 1..=LESSON_COUNT {
        let lesson_id = LessonId::new(n);
        course.lessons.push(LessonRecord {
            id: lesson_id,
            unit_id: BASICS_UNIT,
            lesson_type: LessonType::Standard,
            title: Some(format!("Lesson {n}")),
            order_index: u32::try_from(n - 1).unwrap_or(u32::MAX),
            xp_reward: 10,
            is_legendary: false,
            estimated_minutes: 3,
        });
        if lesson_id == FIRST_LESSON {
            course.exercises.extend(first_lesson_exercises());
        } else {
            course.exercises.extend(drill_exercises(lesson_id));
        }
    }
    course
}
