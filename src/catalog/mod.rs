//! Course catalog: models, repository and student-facing handlers.

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Course, CourseStatus, Lesson};
pub use repository::{CourseRepository, LessonRepository};
