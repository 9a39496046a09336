//! Admin surface: platform stats, user and course management, payment log.

pub mod handlers;
