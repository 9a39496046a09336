//! User authentication: argon2 password hashing, HS256 session JWTs,
//! role-gated request guards.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use middleware::jwt_auth_middleware;
pub use service::{AuthService, Claims};
