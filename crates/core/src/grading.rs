//! Answer validation.
//!
//! Scalars compare case-insensitively after trimming. Sequences compare token
//! for token. Accents, punctuation and inner whitespace are never normalized.

use crate::model::{Answer, AnswerSpec};

/// Returns whether `submitted` satisfies `spec`.
///
/// The canonical answer is checked first; acceptable answers are only
/// consulted when that check fails.
#[must_use]
pub fn validate(spec: &AnswerSpec, submitted: &Answer) -> bool {
    matches_canonical(spec.correct(), submitted) || matches_acceptable(spec.acceptable(), submitted)
}

fn matches_canonical(canonical: &Answer, submitted: &Answer) -> bool {
    match (canonical, submitted) {
        (Answer::Sequence(expected), Answer::Sequence(given)) => expected == given,
        // NOTE: loose containment. A single token counts as correct if it is
        // any element of the canonical sequence.
        (Answer::Sequence(expected), Answer::Scalar(given)) => expected.contains(given),
        (Answer::Scalar(expected), Answer::Sequence(given)) => given.contains(expected),
        (Answer::Scalar(expected), Answer::Scalar(given)) => loosely_equal(expected, given),
    }
}

fn matches_acceptable(acceptable: &[String], submitted: &Answer) -> bool {
    let Some(given) = submitted.leading() else {
        return false;
    };
    acceptable.iter().any(|candidate| loosely_equal(candidate, given))
}

fn loosely_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
