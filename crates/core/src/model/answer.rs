use serde::{Deserialize, Serialize};
use std::fmt;

/// A learner's candidate answer, or the canonical answer of an exercise.
///
/// In course files a scalar is a plain JSON string and a sequence is an array
/// of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Scalar(String),
    Sequence(Vec<String>),
}

impl Answer {
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    #[must_use]
    pub fn sequence<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(tokens.into_iter().map(Into::into).collect())
    }

    /// The scalar value, or the first token of a sequence.
    #[must_use]
    pub fn leading(&self) -> Option<&str> {
        match self {
            Answer::Scalar(value) => Some(value),
            Answer::Sequence(tokens) => tokens.first().map(String::as_str),
        }
    }

    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Answer::Sequence(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Scalar(value) => f.write_str(value),
            Answer::Sequence(tokens) => f.write_str(&tokens.join(" ")),
        }
    }
}

/// What an exercise accepts as correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpec {
    correct: Answer,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    acceptable: Vec<String>,
}

impl AnswerSpec {
    #[must_use]
    pub fn new(correct: Answer) -> Self {
        Self {
            correct,
            acceptable: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_acceptable<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acceptable = answers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn correct(&self) -> &Answer {
        &self.correct
    }

    #[must_use]
    pub fn acceptable(&self) -> &[String] {
        &self.acceptable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shapes_map_to_variants() {
        let scalar: Answer = serde_json::from_str("\"Hola\"").unwrap();
        assert_eq!(scalar, Answer::scalar("Hola"));

        let seq: Answer = serde_json::from_str(r#"["El","niño"]"#).unwrap();
        assert_eq!(seq, Answer::sequence(["El", "niño"]));
    }

    #[test]
    fn display_joins_tokens_with_spaces() {
        assert_eq!(Answer::sequence(["El", "niño", "come"]).to_string(), "El niño come");
        assert_eq!(Answer::scalar("Hola").to_string(), "Hola");
    }

    #[test]
    fn leading_token_of_empty_sequence_is_none() {
        assert_eq!(Answer::Sequence(Vec::new()).leading(), None);
        assert_eq!(Answer::sequence(["a", "b"]).leading(), Some("a"));
    }
}
