//! Per-exercise-type presentation handlers.
//!
//! Each handler knows how to lay an exercise out for the learner and how to
//! turn the learner's gesture into an `Answer` for the engine. Exercise types
//! without a handler map to `ExerciseHandler::Unhandled`.

use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use learn_core::model::{Answer, ChoiceOption, Exercise, ExerciseType};

use crate::error::AdapterError;

//
// ─── HANDLERS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateDirection {
    /// Source language prompt, answer typed in the target language.
    ToTarget,
    /// Target language prompt, answer typed in the source language.
    ToSource,
}

/// Presentation handler chosen for an exercise type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseHandler {
    MultipleChoice,
    WordBank,
    Translate(TranslateDirection),
    MatchPairs,
    FillBlank,
    ListenAndType,
    Unhandled(ExerciseType),
}

impl ExerciseHandler {
    #[must_use]
    pub fn for_type(exercise_type: ExerciseType) -> Self {
        match exercise_type {
            ExerciseType::MultipleChoice => Self::MultipleChoice,
            ExerciseType::WordBank => Self::WordBank,
            ExerciseType::TranslateToTarget => Self::Translate(TranslateDirection::ToTarget),
            ExerciseType::TranslateToSource => Self::Translate(TranslateDirection::ToSource),
            ExerciseType::MatchPairs => Self::MatchPairs,
            ExerciseType::FillBlank => Self::FillBlank,
            ExerciseType::ListenAndType => Self::ListenAndType,
            ExerciseType::ListenAndSelect
            | ExerciseType::Speak
            | ExerciseType::SelectImage
            | ExerciseType::StoryQuestion
            | ExerciseType::CharacterIntro => Self::Unhandled(exercise_type),
        }
    }

    #[must_use]
    pub fn for_exercise(exercise: &Exercise) -> Self {
        Self::for_type(exercise.exercise_type())
    }

    #[must_use]
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unhandled(_))
    }

    /// Lay the exercise out with a thread-local RNG.
    #[must_use]
    pub fn present(self, exercise: &Exercise) -> Presentation {
        self.present_with(exercise, &mut rng())
    }

    /// Lay the exercise out. Word tiles and both matching columns are shuffled.
    #[must_use]
    pub fn present_with<R: Rng + ?Sized>(self, exercise: &Exercise, rng: &mut R) -> Presentation {
        let question = exercise.question();
        match self {
            Self::MultipleChoice | Self::FillBlank => Presentation::Choice {
                prompt: question.question.clone(),
                options: question.options.clone(),
            },
            Self::WordBank => {
                let mut tiles = question.word_bank.clone();
                tiles.shuffle(rng);
                Presentation::Tiles {
                    prompt: question.source_text.clone().or_else(|| question.question.clone()),
                    tiles,
                }
            }
            Self::Translate(direction) => {
                let prompt = match direction {
                    TranslateDirection::ToTarget => question.source_text.clone(),
                    TranslateDirection::ToSource => question.target_text.clone(),
                };
                Presentation::Typing {
                    prompt: prompt.or_else(|| question.question.clone()),
                    audio_ref: None,
                }
            }
            Self::ListenAndType => Presentation::Typing {
                prompt: question.question.clone(),
                audio_ref: question.audio_ref.clone(),
            },
            Self::MatchPairs => {
                let mut left: Vec<String> = question.pairs.iter().map(|p| p.left.clone()).collect();
                let mut right: Vec<String> =
                    question.pairs.iter().map(|p| p.right.clone()).collect();
                left.shuffle(rng);
                right.shuffle(rng);
                Presentation::Matching { left, right }
            }
            Self::Unhandled(exercise_type) => Presentation::Unsupported(exercise_type),
        }
    }

    /// Turn a learner gesture into a candidate answer.
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::Unsupported` for unhandled exercise types,
    /// `AdapterError::GestureMismatch` when the gesture does not fit the
    /// handler, and the input-specific variants when the gesture refers to
    /// content the exercise does not have.
    pub fn answer(self, exercise: &Exercise, gesture: Gesture) -> Result<Answer, AdapterError> {
        let question = exercise.question();
        match (self, gesture) {
            (Self::Unhandled(exercise_type), _) => Err(AdapterError::Unsupported(exercise_type)),
            (Self::MultipleChoice | Self::FillBlank, Gesture::ChooseOption(id)) => {
                let typed = id.trim();
                // Option ids match case-insensitively.
                match question
                    .options
                    .iter()
                    .find(|option| option.id.eq_ignore_ascii_case(typed))
                {
                    Some(option) => Ok(Answer::Scalar(option.id.clone())),
                    None => Err(AdapterError::UnknownOption(id)),
                }
            }
            (Self::Translate(_) | Self::ListenAndType, Gesture::Type(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(AdapterError::EmptyInput);
                }
                Ok(Answer::scalar(trimmed))
            }
            (Self::WordBank, Gesture::ArrangeTiles(tiles)) => {
                if tiles.is_empty() {
                    return Err(AdapterError::EmptyInput);
                }
                let mut available = question.word_bank.clone();
                for tile in &tiles {
                    let Some(pos) = available.iter().position(|word| word == tile) else {
                        return Err(AdapterError::UnknownTile(tile.clone()));
                    };
                    available.swap_remove(pos);
                }
                Ok(Answer::Sequence(tiles))
            }
            (Self::MatchPairs, Gesture::MatchPairs(matches)) => {
                let pairs = &question.pairs;
                let mut matched = vec![false; pairs.len()];
                for PairMatch { left, right } in matches {
                    let Some(index) = pairs
                        .iter()
                        .position(|pair| pair.left == left && pair.right == right)
                    else {
                        return Err(AdapterError::NotAPair { left, right });
                    };
                    matched[index] = true;
                }
                let done = matched.iter().filter(|m| **m).count();
                if done < pairs.len() {
                    return Err(AdapterError::IncompleteMatching {
                        matched: done,
                        total: pairs.len(),
                    });
                }
                Ok(Answer::sequence(pairs.iter().map(|pair| pair.id.clone())))
            }
            (_, gesture) => Err(AdapterError::GestureMismatch {
                exercise_type: exercise.exercise_type(),
                gesture: gesture.kind(),
            }),
        }
    }
}

//
// ─── GESTURES ──────────────────────────────────────────────────────────────────
//

/// One left/right match made by the learner, by displayed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMatch {
    pub left: String,
    pub right: String,
}

impl PairMatch {
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// What the learner did to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Picked a choice by option id.
    ChooseOption(String),
    /// Typed free text.
    Type(String),
    /// Arranged word-bank tiles in order.
    ArrangeTiles(Vec<String>),
    /// Completed the matching board.
    MatchPairs(Vec<PairMatch>),
}

impl Gesture {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Gesture::ChooseOption(_) => "choose_option",
            Gesture::Type(_) => "type",
            Gesture::ArrangeTiles(_) => "arrange_tiles",
            Gesture::MatchPairs(_) => "match_pairs",
        }
    }
}

//
// ─── PRESENTATION ──────────────────────────────────────────────────────────────
//

/// What the learner sees for one exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Choice {
        prompt: Option<String>,
        options: Vec<ChoiceOption>,
    },
    Tiles {
        prompt: Option<String>,
        tiles: Vec<String>,
    },
    Typing {
        prompt: Option<String>,
        audio_ref: Option<String>,
    },
    Matching {
        left: Vec<String>,
        right: Vec<String>,
    },
    Unsupported(ExerciseType),
}
