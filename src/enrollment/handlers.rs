//! Enrollment and lesson progress endpoints.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::writer::{EnrollOutcome, EnrollmentWriter, ProgressSnapshot};
use crate::auth::service::Claims;
use crate::catalog::models::CourseStatus;
use crate::catalog::repository::CourseRepository;
use crate::error::ApiError;
use crate::gateway::{state::AppState, types::ApiResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollRequest {
    #[serde(rename = "courseId")]
    pub course_id: i64,
}

/// Enroll in a published course without a payment
///
/// POST /api/v1/my/enroll
#[utoipa::path(
    post,
    path = "/api/v1/my/enroll",
    request_body = EnrollRequest,
    responses(
        (status = 200, description = "Enrollment recorded", body = ApiResponse<String>),
        (status = 400, description = "Already enrolled"),
        (status = 404, description = "Course not found or not published")
    ),
    tag = "Progress"
)]
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let user_id = claims.user_id()?;

    // Unpublished courses read as missing, matching the catalog view.
    let course = CourseRepository::get_by_id(state.pool(), req.course_id)
        .await?
        .filter(|c| c.status == CourseStatus::Published)
        .ok_or(ApiError::NotFound("course"))?;

    match EnrollmentWriter::enroll(state.pool(), course.course_id, user_id).await? {
        EnrollOutcome::Enrolled => {
            tracing::info!(user_id, course_id = course.course_id, "enrollment recorded");
            Ok(Json(ApiResponse::success(
                "successfully enrolled in course".to_string(),
            )))
        }
        EnrollOutcome::AlreadyEnrolled => Err(ApiError::InvalidState(
            "already enrolled in this course".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProgressUpdateRequest {
    #[serde(rename = "courseId")]
    pub course_id: i64,
    #[serde(rename = "lessonId")]
    pub lesson_id: i64,
    pub completed: bool,
}

/// Mark a lesson complete or incomplete
///
/// POST /api/v1/my/progress
#[utoipa::path(
    post,
    path = "/api/v1/my/progress",
    request_body = ProgressUpdateRequest,
    responses(
        (status = 200, description = "Recomputed progress", body = ApiResponse<ProgressSnapshot>),
        (status = 404, description = "No enrollment for this course")
    ),
    tag = "Progress"
)]
pub async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ProgressUpdateRequest>,
) -> Result<Json<ApiResponse<ProgressSnapshot>>, ApiError> {
    let snapshot = EnrollmentWriter::set_lesson_completion(
        state.pool(),
        req.course_id,
        claims.user_id()?,
        req.lesson_id,
        req.completed,
    )
    .await?
    .ok_or(ApiError::NotFound("enrollment"))?;

    Ok(Json(ApiResponse::success(snapshot)))
}
