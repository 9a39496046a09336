use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::account::models::{Role, UserProfile};
use crate::account::repository::UserRepository;
use crate::error::ApiError;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id as string
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, ApiError> {
        self.sub
            .parse()
            .map_err(|_| ApiError::Unauthorized("malformed token subject".to_string()))
    }
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Asha Verma")]
    pub full_name: String,
    #[validate(email)]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
    /// "user" or "instructor"; admin accounts are provisioned out of band.
    #[schema(example = "user")]
    pub role: String,
}

/// User Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

pub struct AuthService {
    db: Pool<Postgres>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(db: Pool<Postgres>, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    /// Register a new user
    pub async fn register(&self, req: RegisterRequest) -> Result<i64, ApiError> {
        req.validate()
            .map_err(|e| ApiError::InvalidParameter(e.to_string()))?;

        let role = Role::self_assignable(&req.role)
            .ok_or_else(|| ApiError::InvalidParameter(format!("invalid role: {}", req.role)))?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?
            .to_string();

        let user_id =
            UserRepository::create(&self.db, &req.full_name, &req.email, &password_hash, role)
                .await?
                .ok_or_else(|| {
                    ApiError::InvalidState("email already registered".to_string())
                })?;

        tracing::info!(user_id, role = role.as_str(), "user registered");
        Ok(user_id)
    }

    /// Login user and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = UserRepository::get_by_email(&self.db, &req.email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("invalid email or password".to_string()))?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored hash invalid: {e}")))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| ApiError::Unauthorized("invalid email or password".to_string()))?;

        let token = self.issue_token(user.user_id, user.role)?;

        Ok(AuthResponse {
            token,
            user_id: user.user_id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        })
    }

    /// Sign a session token for the given user; valid 7 days.
    pub fn issue_token(&self, user_id: i64, role: Role) -> Result<String, ApiError> {
        let now = Utc::now();
        let expiration = now + Duration::days(7);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| ApiError::Unauthorized("invalid or expired token".to_string()))?;
        Ok(token_data.claims)
    }

    /// Profile of the authenticated user.
    pub async fn current_user(&self, user_id: i64) -> Result<UserProfile, ApiError> {
        let user = UserRepository::get_by_id(&self.db, user_id)
            .await?
            .ok_or(ApiError::NotFound("user"))?;
        Ok(user.into())
    }
}
