//! CourseDeck - course marketplace backend
//!
//! Architecture:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌────────────┐    ┌───────────┐
//! │ Gateway  │───▶│ Payment  │───▶│ Enrollment │───▶│   Stats   │
//! │ (axum)   │    │ (verify) │    │  (writer)  │    │ (rollups) │
//! └──────────┘    └──────────┘    └────────────┘    └───────────┘
//! ```
//!
//! Enrollment is a single fact table keyed by (course_id, student_id);
//! payment verification enrolls through one transaction so a duplicate
//! or racing callback can never double-enroll.

pub mod account;
pub mod admin;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod content;
pub mod db;
pub mod enrollment;
pub mod error;
pub mod gateway;
pub mod instructor;
pub mod logging;
pub mod payment;
pub mod stats;

pub use config::AppConfig;
pub use error::ApiError;
