//! User account management: models and repository.

pub mod models;
pub mod repository;

pub use models::{Role, User, UserProfile};
pub use repository::UserRepository;
