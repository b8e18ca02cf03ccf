#![forbid(unsafe_code)]

pub mod course;
pub mod repository;
pub mod sample;

pub use course::{CourseError, CourseFile, ExerciseRecord, LessonRecord};
pub use repository::{
    InMemoryRepository, LessonCatalog, ProfileRepository, Storage, StorageError,
};
