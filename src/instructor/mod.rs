//! Instructor surface: course CRUD with content uploads, roster, stats.

pub mod handlers;
