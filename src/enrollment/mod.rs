//! Enrollment facts and lesson progress.
//!
//! A single `enrollments_tb` row per (course, student) is the source of
//! truth for "is enrolled"; both the course roster and the user's course
//! list are derived from it by query. Writes are conditional inserts, so
//! retried or concurrent calls cannot duplicate an enrollment.

pub mod handlers;
pub mod progress;
pub mod writer;

pub use progress::{learning_hours, progress_pct};
pub use writer::{EnrollmentWriter, EnrollOutcome};
