//! Repository layer for user rows

use super::models::{Role, User};
use sqlx::{PgPool, Row};

fn row_to_user(r: &sqlx::postgres::PgRow) -> User {
    User {
        user_id: r.get("user_id"),
        full_name: r.get("full_name"),
        email: r.get("email"),
        password_hash: r.get("password_hash"),
        role: Role::parse(r.get::<&str, _>("role")),
        created_at: r.get("created_at"),
    }
}

const USER_COLUMNS: &str = "user_id, full_name, email, password_hash, role, created_at";

/// User repository for CRUD operations
pub struct UserRepository;

impl UserRepository {
    /// Get user by ID
    pub async fn get_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users_tb WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)))
    }

    /// Get user by email
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users_tb WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)))
    }

    /// Create a new user. Returns None when the email is already taken.
    pub async fn create(
        pool: &PgPool,
        full_name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query(
            r#"INSERT INTO users_tb (full_name, email, password_hash, role)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (email) DO NOTHING
               RETURNING user_id"#,
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| r.get("user_id")))
    }

    /// List all users, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users_tb ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(row_to_user).collect())
    }

    /// Update profile fields (admin operation)
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        full_name: &str,
        email: &str,
        role: Role,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "UPDATE users_tb SET full_name = $2, email = $3, role = $4
             WHERE user_id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(role.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_user(&r)))
    }

    /// Delete a user row. Enrollments and payments cascade via FK.
    pub async fn delete(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM users_tb WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Count users holding a given role
    pub async fn count_by_role(pool: &PgPool, role: Role) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users_tb WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(pool)
            .await?;
        Ok(row.get("n"))
    }
}
