use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::answer::{Answer, AnswerSpec};
use crate::model::ids::{ExerciseId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseError {
    #[error("unknown exercise type: {0}")]
    UnknownType(String),

    #[error("{exercise_type} exercise requires {field}")]
    MissingPayload {
        exercise_type: ExerciseType,
        field: &'static str,
    },

    #[error("canonical answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── EXERCISE TYPE ─────────────────────────────────────────────────────────────
//

/// Closed set of exercise kinds a lesson can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    TranslateToTarget,
    TranslateToSource,
    ListenAndType,
    ListenAndSelect,
    Speak,
    MultipleChoice,
    FillBlank,
    WordBank,
    MatchPairs,
    SelectImage,
    StoryQuestion,
    CharacterIntro,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 12] = [
        ExerciseType::TranslateToTarget,
        ExerciseType::TranslateToSource,
        ExerciseType::ListenAndType,
        ExerciseType::ListenAndSelect,
        ExerciseType::Speak,
        ExerciseType::MultipleChoice,
        ExerciseType::FillBlank,
        ExerciseType::WordBank,
        ExerciseType::MatchPairs,
        ExerciseType::SelectImage,
        ExerciseType::StoryQuestion,
        ExerciseType::CharacterIntro,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseType::TranslateToTarget => "translate_to_target",
            ExerciseType::TranslateToSource => "translate_to_source",
            ExerciseType::ListenAndType => "listen_and_type",
            ExerciseType::ListenAndSelect => "listen_and_select",
            ExerciseType::Speak => "speak",
            ExerciseType::MultipleChoice => "multiple_choice",
            ExerciseType::FillBlank => "fill_blank",
            ExerciseType::WordBank => "word_bank",
            ExerciseType::MatchPairs => "match_pairs",
            ExerciseType::SelectImage => "select_image",
            ExerciseType::StoryQuestion => "story_question",
            ExerciseType::CharacterIntro => "character_intro",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = ExerciseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ExerciseError::UnknownType(s.to_owned()))
    }
}

//
// ─── QUESTION PAYLOAD ──────────────────────────────────────────────────────────
//

/// One selectable option of a choice-style exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
}

impl ChoiceOption {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            image_ref: None,
            audio_ref: None,
        }
    }
}

/// A left/right pair of a matching exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub id: String,
    pub left: String,
    pub right: String,
}

impl MatchPair {
    #[must_use]
    pub fn new(id: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Type-dependent question content. Every field is optional; which ones are
/// required depends on the exercise type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub word_bank: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<MatchPair>,
}

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// Immutable exercise definition supplied by the content catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    id: ExerciseId,
    lesson_id: LessonId,
    exercise_type: ExerciseType,
    order_index: u32,
    question: QuestionData,
    answer: AnswerSpec,
    hint: Option<String>,
    explanation: Option<String>,
    difficulty: u8,
}

impl Exercise {
    /// Creates an exercise, checking that the payload carries what its type
    /// needs to be presented.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseError::MissingPayload` when choice, word-bank or
    /// matching content is absent, and `ExerciseError::EmptyAnswer` for an
    /// empty canonical answer.
    pub fn new(
        id: ExerciseId,
        lesson_id: LessonId,
        exercise_type: ExerciseType,
        question: QuestionData,
        answer: AnswerSpec,
    ) -> Result<Self, ExerciseError> {
        let empty_answer = match answer.correct() {
            Answer::Scalar(value) => value.trim().is_empty(),
            Answer::Sequence(tokens) => tokens.is_empty(),
        };
        if empty_answer {
            return Err(ExerciseError::EmptyAnswer);
        }

        let missing = match exercise_type {
            ExerciseType::MultipleChoice | ExerciseType::FillBlank | ExerciseType::SelectImage
                if question.options.is_empty() =>
            {
                Some("options")
            }
            ExerciseType::WordBank if question.word_bank.is_empty() => Some("word_bank"),
            ExerciseType::MatchPairs if question.pairs.is_empty() => Some("pairs"),
            _ => None,
        };
        if let Some(field) = missing {
            return Err(ExerciseError::MissingPayload {
                exercise_type,
                field,
            });
        }

        Ok(Self {
            id,
            lesson_id,
            exercise_type,
            order_index: 0,
            question,
            answer,
            hint: None,
            explanation: None,
            difficulty: 1,
        })
    }

    #[must_use]
    pub fn with_order_index(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn id(&self) -> ExerciseId {
        self.id
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    #[must_use]
    pub fn question(&self) -> &QuestionData {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerSpec {
        &self.answer
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
