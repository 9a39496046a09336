//! Student-facing catalog endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use sqlx::Row;
use std::sync::Arc;
use utoipa::ToSchema;

use super::models::{Course, CourseSummary, Lesson};
use super::repository::{CourseRepository, LessonRepository};
use crate::auth::service::Claims;
use crate::enrollment::writer::EnrollmentWriter;
use crate::error::ApiError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::stats::{self, StudentStats};

/// An enrolled course with the caller's progress attached.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: Course,
    pub progress: i32,
}

/// Course content returned to enrolled students only.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseContent {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

/// Browse published courses
///
/// GET /api/v1/courses
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Published catalog", body = ApiResponse<Vec<CourseSummary>>)
    ),
    tag = "Catalog"
)]
pub async fn list_available(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<CourseSummary>>>, ApiError> {
    let courses = CourseRepository::list_published(state.pool()).await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// Courses the caller is enrolled in, with progress
///
/// GET /api/v1/my/courses
#[utoipa::path(
    get,
    path = "/api/v1/my/courses",
    responses(
        (status = 200, description = "Enrolled courses", body = ApiResponse<Vec<EnrolledCourse>>)
    ),
    tag = "Catalog"
)]
pub async fn list_enrolled(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<EnrolledCourse>>>, ApiError> {
    let user_id = claims.user_id()?;

    // Draft courses stay hidden even after an enrollment was granted.
    let rows = sqlx::query(
        r#"SELECT c.course_id, c.title, c.description, c.price, c.category,
                  c.thumbnail, c.video, c.instructor_id, c.status, c.created_at,
                  e.progress
           FROM enrollments_tb e
           JOIN courses_tb c ON c.course_id = e.course_id
           WHERE e.student_id = $1 AND c.status <> 'draft'
           ORDER BY e.enrolled_at DESC"#,
    )
    .bind(user_id)
    .fetch_all(state.pool())
    .await?;

    let courses = rows
        .iter()
        .map(|r| EnrolledCourse {
            course: Course {
                course_id: r.get("course_id"),
                title: r.get("title"),
                description: r.get("description"),
                price: r.get("price"),
                category: r.get("category"),
                thumbnail: r.get("thumbnail"),
                video: r.get("video"),
                instructor_id: r.get("instructor_id"),
                status: super::models::CourseStatus::parse(r.get::<&str, _>("status"))
                    .unwrap_or(super::models::CourseStatus::Draft),
                created_at: r.get("created_at"),
            },
            progress: r.get("progress"),
        })
        .collect();

    Ok(Json(ApiResponse::success(courses)))
}

/// Course content, enrolled students only
///
/// GET /api/v1/my/courses/{course_id}
#[utoipa::path(
    get,
    path = "/api/v1/my/courses/{course_id}",
    params(("course_id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course with lessons", body = ApiResponse<CourseContent>),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Course not found")
    ),
    tag = "Catalog"
)]
pub async fn course_content(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<CourseContent>>, ApiError> {
    let user_id = claims.user_id()?;

    let course = CourseRepository::get_by_id(state.pool(), course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    if !EnrollmentWriter::is_enrolled(state.pool(), course_id, user_id).await? {
        return Err(ApiError::Forbidden(
            "purchase this course to access its content".to_string(),
        ));
    }

    let lessons = LessonRepository::list_for_course(state.pool(), course_id).await?;

    Ok(Json(ApiResponse::success(CourseContent { course, lessons })))
}

/// Student dashboard stats
///
/// GET /api/v1/my/stats
#[utoipa::path(
    get,
    path = "/api/v1/my/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<StudentStats>)
    ),
    tag = "Catalog"
)]
pub async fn my_stats(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<StudentStats>>, ApiError> {
    let stats = stats::student_stats(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(stats)))
}
