//! Admin endpoints. All handlers require the admin role.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::account::{Role, UserProfile, UserRepository};
use crate::auth::middleware::require_role;
use crate::auth::service::Claims;
use crate::catalog::models::Course;
use crate::catalog::repository::CourseRepository;
use crate::error::ApiError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::payment::models::{Payment, PaymentRepository};
use crate::stats::{self, AdminStats};

/// Platform-wide counters and gross revenue
///
/// GET /api/v1/admin/stats
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "User, course, enrollment counts and total revenue",
         body = ApiResponse<AdminStats>),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "Admin"
)]
pub async fn platform_stats(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<AdminStats>>, ApiError> {
    require_role(&claims, Role::Admin)?;
    let stats = stats::admin_stats(state.pool()).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// List every registered user
///
/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    require_role(&claims, Role::Admin)?;
    let users = UserRepository::list_all(state.pool()).await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserProfile::from).collect(),
    )))
}

/// Get a single user
///
/// GET /api/v1/admin/users/{user_id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    require_role(&claims, Role::Admin)?;
    let user = UserRepository::get_by_id(state.pool(), user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(ApiResponse::success(UserProfile::from(user))))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserUpdateRequest {
    pub full_name: String,
    pub email: String,
    pub role: String,
}

/// Update a user's profile or role
///
/// PUT /api/v1/admin/users/{user_id}
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
    Json(req): Json<UserUpdateRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    require_role(&claims, Role::Admin)?;

    let role = Role::parse(&req.role);
    let user = UserRepository::update(state.pool(), user_id, &req.full_name, &req.email, role)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(ApiResponse::success(UserProfile::from(user))))
}

/// Delete a user. Admin accounts cannot be deleted. Deleting an
/// instructor removes their courses and uploaded files first.
///
/// DELETE /api/v1/admin/users/{user_id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    require_role(&claims, Role::Admin)?;

    let user = UserRepository::get_by_id(state.pool(), user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if user.role == Role::Admin {
        return Err(ApiError::Forbidden(
            "admin accounts cannot be deleted".to_string(),
        ));
    }

    if user.role == Role::Instructor {
        let courses = CourseRepository::list_by_instructor(state.pool(), user_id).await?;
        for course in &courses {
            if let Some(thumb) = &course.thumbnail {
                state.content.remove(thumb).await;
            }
            if let Some(video) = &course.video {
                state.content.remove(video).await;
            }
        }
    }

    UserRepository::delete(state.pool(), user_id).await?;
    tracing::info!(user_id, role = user.role.as_str(), "user deleted");
    Ok(Json(ApiResponse::success("user deleted".to_string())))
}

/// List every course in any status
///
/// GET /api/v1/admin/courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    require_role(&claims, Role::Admin)?;
    let courses = CourseRepository::list_all(state.pool()).await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// Get a single course
///
/// GET /api/v1/admin/courses/{course_id}
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    require_role(&claims, Role::Admin)?;
    let course = CourseRepository::get_by_id(state.pool(), course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    Ok(Json(ApiResponse::success(course)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CourseUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<rust_decimal::Decimal>,
    pub status: Option<crate::catalog::models::CourseStatus>,
}

/// Update any course's editable fields
///
/// PUT /api/v1/admin/courses/{course_id}
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Json(req): Json<CourseUpdateRequest>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    require_role(&claims, Role::Admin)?;

    let existing = CourseRepository::get_by_id(state.pool(), course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let course = CourseRepository::update(
        state.pool(),
        course_id,
        req.title.as_deref().unwrap_or(&existing.title),
        req.description.as_deref().unwrap_or(&existing.description),
        req.price.unwrap_or(existing.price),
        req.status.unwrap_or(existing.status),
        None,
        None,
    )
    .await?
    .ok_or(ApiError::NotFound("course"))?;

    Ok(Json(ApiResponse::success(course)))
}

/// Delete any course, removing its stored files first
///
/// DELETE /api/v1/admin/courses/{course_id}
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    require_role(&claims, Role::Admin)?;

    let course = CourseRepository::get_by_id(state.pool(), course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    if let Some(thumb) = &course.thumbnail {
        state.content.remove(thumb).await;
    }
    if let Some(video) = &course.video {
        state.content.remove(video).await;
    }

    CourseRepository::delete(state.pool(), course_id).await?;
    tracing::info!(course_id, "course deleted by admin");
    Ok(Json(ApiResponse::success("course deleted".to_string())))
}

/// Full payment log, newest first
///
/// GET /api/v1/admin/payments
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, ApiError> {
    require_role(&claims, Role::Admin)?;
    let payments = PaymentRepository::list_all(state.pool()).await?;
    Ok(Json(ApiResponse::success(payments)))
}
