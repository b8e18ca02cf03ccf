//! Line-based rendering and input parsing for the terminal driver.

use learn_core::model::{Exercise, LessonSummary};
use services::{ExerciseHandler, Gesture, PairMatch, Presentation, Verdict};

/// Typed on its own line to leave the lesson.
pub const QUIT: &str = ":q";

/// Render an exercise as text lines.
#[must_use]
pub fn render(exercise: &Exercise, presentation: &Presentation) -> Vec<String> {
    let mut lines = vec![format!("[{}]", exercise.exercise_type())];
    match presentation {
        Presentation::Choice { prompt, options } => {
            lines.extend(prompt.clone());
            lines.extend(
                options
                    .iter()
                    .map(|option| format!("  {}) {}", option.id, option.text)),
            );
            lines.push("Type the letter of your choice.".into());
        }
        Presentation::Tiles { prompt, tiles } => {
            lines.extend(prompt.clone());
            lines.push(format!("  words: {}", tiles.join(" | ")));
            lines.push("Type the words in order, separated by spaces.".into());
        }
        Presentation::Typing { prompt, audio_ref } => {
            lines.extend(prompt.clone());
            if let Some(audio) = audio_ref {
                lines.push(format!("  (audio: {audio})"));
            }
            lines.push("Type your answer.".into());
        }
        Presentation::Matching { left, right } => {
            lines.push(format!("  left:  {}", left.join(" | ")));
            lines.push(format!("  right: {}", right.join(" | ")));
            lines.push("Match every pair as left=right, separated by commas.".into());
        }
        Presentation::Unsupported(exercise_type) => {
            lines.push(format!("  {exercise_type} exercises are not available yet."));
            lines.push("Type anything to continue.".into());
        }
    }
    if let Some(hint) = exercise.hint() {
        lines.push(format!("  hint: {hint}"));
    }
    lines
}

/// Read one input line as the gesture the handler expects.
///
/// Returns `None` for a line that cannot be a gesture, such as a matching
/// entry without `=`.
#[must_use]
pub fn parse_gesture(handler: ExerciseHandler, line: &str) -> Option<Gesture> {
    let line = line.trim();
    match handler {
        ExerciseHandler::MultipleChoice | ExerciseHandler::FillBlank => {
            Some(Gesture::ChooseOption(line.to_owned()))
        }
        ExerciseHandler::WordBank => Some(Gesture::ArrangeTiles(
            line.split_whitespace().map(str::to_owned).collect(),
        )),
        ExerciseHandler::MatchPairs => line
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| {
                let (left, right) = entry.split_once('=')?;
                Some(PairMatch::new(left.trim(), right.trim()))
            })
            .collect::<Option<Vec<_>>>()
            .map(Gesture::MatchPairs),
        ExerciseHandler::Translate(_)
        | ExerciseHandler::ListenAndType
        | ExerciseHandler::Unhandled(_) => Some(Gesture::Type(line.to_owned())),
    }
}

#[must_use]
pub fn render_verdict(verdict: &Verdict, exercise: &Exercise) -> Vec<String> {
    let mut lines = Vec::new();
    if verdict.correct {
        lines.push("Correct!".into());
    } else {
        lines.push(format!("Not quite. Answer: {}", verdict.correct_answer));
        if let Some(explanation) = exercise.explanation() {
            lines.push(format!("  {explanation}"));
        }
    }
    lines.push(format!("Hearts: {}", verdict.hearts_remaining));
    if verdict.out_of_hearts {
        lines.push("You are out of hearts.".into());
    }
    lines
}

#[must_use]
pub fn render_summary(summary: &LessonSummary) -> Vec<String> {
    let mut lines = vec![
        "Lesson complete!".to_string(),
        format!("  XP earned: {}", summary.xp_earned),
        format!(
            "  Accuracy: {}% ({}/{})",
            summary.accuracy, summary.correct, summary.total_exercises
        ),
        format!("  Time: {}s", summary.time_spent_secs()),
    ];
    if summary.is_perfect {
        lines.push("  Perfect lesson!".into());
    }
    lines
}
