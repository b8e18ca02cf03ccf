use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{LessonId, UnitId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be blank")]
    BlankTitle,

    #[error("unknown lesson type: {0}")]
    UnknownType(String),
}

//
// ─── LESSON TYPE ───────────────────────────────────────────────────────────────
//

/// Kind of lesson as presented on the learning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    #[default]
    Standard,
    Story,
    Review,
    Test,
    Legendary,
    Audio,
}

impl LessonType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Standard => "standard",
            LessonType::Story => "story",
            LessonType::Review => "review",
            LessonType::Test => "test",
            LessonType::Legendary => "legendary",
            LessonType::Audio => "audio",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonType {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "standard" => Ok(Self::Standard),
            "story" => Ok(Self::Story),
            "review" => Ok(Self::Review),
            "test" => Ok(Self::Test),
            "legendary" => Ok(Self::Legendary),
            "audio" => Ok(Self::Audio),
            other => Err(LessonError::UnknownType(other.to_owned())),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Immutable lesson definition supplied by the content catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    unit_id: UnitId,
    lesson_type: LessonType,
    title: Option<String>,
    order_index: u32,
    xp_reward: u32,
    is_legendary: bool,
    estimated_minutes: u32,
}

impl Lesson {
    /// Creates a lesson with the given reward; other attributes use defaults
    /// and can be set with the `with_*` methods.
    #[must_use]
    pub fn new(id: LessonId, unit_id: UnitId, lesson_type: LessonType, xp_reward: u32) -> Self {
        Self {
            id,
            unit_id,
            lesson_type,
            title: None,
            order_index: 0,
            xp_reward,
            is_legendary: matches!(lesson_type, LessonType::Legendary),
            estimated_minutes: 0,
        }
    }

    /// Sets the display title.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::BlankTitle` if the title is empty after trimming.
    pub fn with_title(mut self, title: impl Into<String>) -> Result<Self, LessonError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::BlankTitle);
        }
        self.title = Some(title);
        Ok(self)
    }

    #[must_use]
    pub fn with_order_index(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }

    #[must_use]
    pub fn with_legendary(mut self, is_legendary: bool) -> Self {
        self.is_legendary = is_legendary;
        self
    }

    #[must_use]
    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = minutes;
        self
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn unit_id(&self) -> UnitId {
        self.unit_id
    }

    #[must_use]
    pub fn lesson_type(&self) -> LessonType {
        self.lesson_type
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn order_index(&self) -> u32 {
        self.order_index
    }

    #[must_use]
    pub fn xp_reward(&self) -> u32 {
        self.xp_reward
    }

    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.is_legendary
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let lesson = Lesson::new(LessonId::new(1), UnitId::new(2), LessonType::Standard, 10)
            .with_title("  Basics 1 ")
            .unwrap()
            .with_order_index(3)
            .with_estimated_minutes(4);

        assert_eq!(lesson.title(), Some("Basics 1"));
        assert_eq!(lesson.order_index(), 3);
        assert_eq!(lesson.xp_reward(), 10);
        assert_eq!(lesson.estimated_minutes(), 4);
        assert!(!lesson.is_legendary());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Lesson::new(LessonId::new(1), UnitId::new(1), LessonType::Story, 5)
            .with_title("   ")
            .unwrap_err();
        assert_eq!(err, LessonError::BlankTitle);
    }

    #[test]
    fn legendary_type_defaults_flag() {
        let lesson = Lesson::new(LessonId::new(9), UnitId::new(1), LessonType::Legendary, 40);
        assert!(lesson.is_legendary());
    }

    #[test]
    fn lesson_type_parses_known_names() {
        assert_eq!("audio".parse::<LessonType>().unwrap(), LessonType::Audio);
        assert!(matches!(
            "boss".parse::<LessonType>(),
            Err(LessonError::UnknownType(name)) if name == "boss"
        ));
    }
}
