#![forbid(unsafe_code)]

pub mod adapters;
pub mod error;
pub mod profile_service;
pub mod sessions;

pub use learn_core::Clock;
pub use sessions as session;

pub use adapters::{ExerciseHandler, Gesture, PairMatch, Presentation, TranslateDirection};
pub use error::{AdapterError, ProfileServiceError, SessionError};
pub use profile_service::ProfileService;

pub use sessions::{
    EngineState, LessonAnswerResult, LessonEngine, LessonLoopService, LessonOutcome,
    LessonSession, LessonStep, SessionProgress, Verdict,
};
