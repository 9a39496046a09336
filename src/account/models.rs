//! Data models for user account management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User role, stored as lowercase text in `users_tb.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    /// Parse a stored role value. Unknown values collapse to `User`,
    /// never to a privileged role.
    pub fn parse(s: &str) -> Role {
        match s {
            "instructor" => Role::Instructor,
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    /// Roles a client may pick at registration time.
    pub fn self_assignable(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "instructor" => Some(Role::Instructor),
            _ => None,
        }
    }
}

/// User account row
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User view returned by the API (no password hash).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserProfile {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::parse("instructor"), Role::Instructor);
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
    }

    #[test]
    fn test_unknown_role_is_not_privileged() {
        assert_eq!(Role::parse("superadmin"), Role::User);
        assert_eq!(Role::parse(""), Role::User);
    }

    #[test]
    fn test_admin_not_self_assignable() {
        assert_eq!(Role::self_assignable("user"), Some(Role::User));
        assert_eq!(Role::self_assignable("instructor"), Some(Role::Instructor));
        assert_eq!(Role::self_assignable("admin"), None);
    }

    #[test]
    fn test_profile_drops_password_hash() {
        let user = User {
            user_id: 1,
            full_name: "Test".into(),
            email: "t@example.com".into(),
            password_hash: "secret".into(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!json.contains("secret"));
    }
}
