//! Instructor endpoints. Every handler re-checks the instructor role and
//! scopes queries to courses owned by the caller.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::account::models::Role;
use crate::auth::middleware::require_role;
use crate::auth::service::Claims;
use crate::catalog::models::{Course, CourseStatus, Lesson};
use crate::catalog::repository::{CourseRepository, LessonRepository, NewCourse};
use crate::content::{ContentStore, KIND_THUMBNAIL, KIND_VIDEO};
use crate::error::ApiError;
use crate::gateway::{state::AppState, types::ApiResponse};
use crate::stats::{self, InstructorStats};

/// Fields collected from the multipart course form. Text fields arrive as
/// strings; thumbnail/video parts are persisted immediately and recorded
/// by relative path.
#[derive(Debug, Default)]
struct CourseForm {
    title: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    category: Option<String>,
    status: Option<CourseStatus>,
    thumbnail: Option<String>,
    video: Option<String>,
}

async fn parse_course_form(
    mut multipart: Multipart,
    content: &ContentStore,
) -> Result<CourseForm, ApiError> {
    let mut form = CourseForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidParameter(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "title" => form.title = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "category" => form.category = Some(read_text(field).await?),
            "price" => {
                let raw = read_text(field).await?;
                let price = Decimal::from_str(raw.trim())
                    .map_err(|_| ApiError::InvalidParameter(format!("invalid price: {raw}")))?;
                form.price = Some(price);
            }
            "status" => {
                let raw = read_text(field).await?;
                let status = CourseStatus::parse(raw.trim())
                    .ok_or_else(|| ApiError::InvalidParameter(format!("invalid status: {raw}")))?;
                form.status = Some(status);
            }
            "thumbnail" | "video" => {
                let original = field.file_name().unwrap_or("upload").to_string();
                let kind = if name == "thumbnail" {
                    KIND_THUMBNAIL
                } else {
                    KIND_VIDEO
                };
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::InvalidParameter(format!("upload read failed: {e}"))
                })?;
                let stored = content.save(kind, &original, bytes).await?;
                if kind == KIND_THUMBNAIL {
                    form.thumbnail = Some(stored);
                } else {
                    form.video = Some(stored);
                }
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::InvalidParameter(format!("malformed form field: {e}")))
}

/// Create a course (multipart: title, description, price, category,
/// thumbnail file, video file)
///
/// POST /api/v1/instructor/courses
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), ApiError> {
    require_role(&claims, Role::Instructor)?;
    let instructor_id = claims.user_id()?;

    let form = parse_course_form(multipart, &state.content).await?;

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidParameter("title is required".to_string()))?;
    let price = form
        .price
        .ok_or_else(|| ApiError::InvalidParameter("price is required".to_string()))?;

    let new = NewCourse {
        title,
        description: form.description.unwrap_or_default(),
        price,
        category: form.category.unwrap_or_else(|| "Other".to_string()),
        thumbnail: form.thumbnail,
        video: form.video,
        instructor_id,
        status: form.status.unwrap_or(CourseStatus::Published),
    };

    let course = CourseRepository::create(state.pool(), &new).await?;
    tracing::info!(instructor_id, course_id = course.course_id, "course created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))))
}

/// List the caller's courses
///
/// GET /api/v1/instructor/courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    let courses =
        CourseRepository::list_by_instructor(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(courses)))
}

/// Get one owned course
///
/// GET /api/v1/instructor/courses/{course_id}
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    let course = CourseRepository::get_owned(state.pool(), course_id, claims.user_id()?)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    Ok(Json(ApiResponse::success(course)))
}

/// Update an owned course (multipart; new thumbnail/video replace the old
/// files, whose removal is best-effort)
///
/// PUT /api/v1/instructor/courses/{course_id}
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    let instructor_id = claims.user_id()?;

    let existing = CourseRepository::get_owned(state.pool(), course_id, instructor_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let form = parse_course_form(multipart, &state.content).await?;

    let updated = CourseRepository::update(
        state.pool(),
        course_id,
        form.title.as_deref().unwrap_or(&existing.title),
        form.description.as_deref().unwrap_or(&existing.description),
        form.price.unwrap_or(existing.price),
        form.status.unwrap_or(existing.status),
        form.thumbnail.as_deref(),
        form.video.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("course"))?;

    // Replaced files are cleaned up after the row update sticks.
    if form.thumbnail.is_some() {
        if let Some(old) = &existing.thumbnail {
            state.content.remove(old).await;
        }
    }
    if form.video.is_some() {
        if let Some(old) = &existing.video {
            state.content.remove(old).await;
        }
    }

    Ok(Json(ApiResponse::success(updated)))
}

/// Delete an owned course and its stored files
///
/// DELETE /api/v1/instructor/courses/{course_id}
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    let course = CourseRepository::get_owned(state.pool(), course_id, claims.user_id()?)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    if let Some(thumb) = &course.thumbnail {
        state.content.remove(thumb).await;
    }
    if let Some(video) = &course.video {
        state.content.remove(video).await;
    }

    CourseRepository::delete(state.pool(), course_id).await?;
    tracing::info!(course_id, "course deleted");
    Ok(Json(ApiResponse::success("course deleted".to_string())))
}

/// Add a lesson to an owned course (multipart: title, position,
/// duration_minutes, video file)
///
/// POST /api/v1/instructor/courses/{course_id}/lessons
pub async fn add_lesson(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Lesson>>), ApiError> {
    require_role(&claims, Role::Instructor)?;
    CourseRepository::get_owned(state.pool(), course_id, claims.user_id()?)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let mut title: Option<String> = None;
    let mut position: Option<i32> = None;
    let mut duration_minutes: Option<i32> = None;
    let mut video_url = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidParameter(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "position" => {
                let raw = read_text(field).await?;
                let n = raw.trim().parse().map_err(|_| {
                    ApiError::InvalidParameter(format!("invalid position: {raw}"))
                })?;
                position = Some(n);
            }
            "duration_minutes" => {
                let raw = read_text(field).await?;
                let n = raw.trim().parse().map_err(|_| {
                    ApiError::InvalidParameter(format!("invalid duration: {raw}"))
                })?;
                duration_minutes = Some(n);
            }
            "video" => {
                let original = field.file_name().unwrap_or("lesson").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::InvalidParameter(format!("upload read failed: {e}"))
                })?;
                video_url = state.content.save(KIND_VIDEO, &original, bytes).await?;
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidParameter("title is required".to_string()))?;

    // New lessons append to the end unless a position is given.
    let position = match position {
        Some(p) => p,
        None => LessonRepository::count_for_course(state.pool(), course_id).await? as i32,
    };

    let lesson = LessonRepository::add(
        state.pool(),
        course_id,
        &title,
        position,
        &video_url,
        duration_minutes,
    )
    .await?;

    tracing::info!(course_id, lesson_id = lesson.lesson_id, "lesson added");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lesson))))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: CourseStatus,
}

/// Change the status of an owned course
///
/// PATCH /api/v1/instructor/courses/{course_id}/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    CourseRepository::get_owned(state.pool(), course_id, claims.user_id()?)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let course = CourseRepository::set_status(state.pool(), course_id, req.status)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    Ok(Json(ApiResponse::success(course)))
}

/// Instructor dashboard stats
///
/// GET /api/v1/instructor/stats
#[utoipa::path(
    get,
    path = "/api/v1/instructor/stats",
    responses(
        (status = 200, description = "Courses, distinct students, revenue",
         body = ApiResponse<InstructorStats>),
        (status = 403, description = "Caller is not an instructor")
    ),
    tag = "Instructor"
)]
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<InstructorStats>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    let stats = stats::instructor_stats(state.pool(), claims.user_id()?).await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// One roster row per (course, student) pair.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentRecord {
    pub course_id: i64,
    pub course_title: String,
    pub student_id: i64,
    pub student_name: String,
    pub student_email: String,
    pub enrolled_at: DateTime<Utc>,
    pub progress: i32,
}

/// Roster of students across the caller's courses
///
/// GET /api/v1/instructor/enrollments
pub async fn list_enrollments(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<EnrollmentRecord>>>, ApiError> {
    require_role(&claims, Role::Instructor)?;
    let instructor_id = claims.user_id()?;

    let rows = sqlx::query(
        r#"SELECT e.course_id, c.title AS course_title,
                  e.student_id, u.full_name AS student_name, u.email AS student_email,
                  e.enrolled_at, e.progress
           FROM enrollments_tb e
           JOIN courses_tb c ON c.course_id = e.course_id
           JOIN users_tb u ON u.user_id = e.student_id
           WHERE c.instructor_id = $1
           ORDER BY e.enrolled_at DESC"#,
    )
    .bind(instructor_id)
    .fetch_all(state.pool())
    .await?;

    let records = rows
        .iter()
        .map(|r| EnrollmentRecord {
            course_id: r.get("course_id"),
            course_title: r.get("course_title"),
            student_id: r.get("student_id"),
            student_name: r.get("student_name"),
            student_email: r.get("student_email"),
            enrolled_at: r.get("enrolled_at"),
            progress: r.get("progress"),
        })
        .collect();

    Ok(Json(ApiResponse::success(records)))
}
