mod engine;
mod progress;
mod state;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::LessonEngine;
pub use progress::SessionProgress;
pub use state::{EngineState, LessonSession, Verdict};
pub use workflow::{LessonAnswerResult, LessonLoopService, LessonOutcome, LessonStep};
