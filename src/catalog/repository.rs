//! Repository layer for courses and lessons

use super::models::{Course, CourseStatus, CourseSummary, Lesson};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

fn row_to_course(r: &sqlx::postgres::PgRow) -> Course {
    Course {
        course_id: r.get("course_id"),
        title: r.get("title"),
        description: r.get("description"),
        price: r.get("price"),
        category: r.get("category"),
        thumbnail: r.get("thumbnail"),
        video: r.get("video"),
        instructor_id: r.get("instructor_id"),
        status: CourseStatus::parse(r.get::<&str, _>("status")).unwrap_or(CourseStatus::Draft),
        created_at: r.get("created_at"),
    }
}

const COURSE_COLUMNS: &str = "course_id, title, description, price, category, thumbnail, video, \
                              instructor_id, status, created_at";

/// New course fields collected from the instructor upload form.
#[derive(Debug)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
    pub instructor_id: i64,
    pub status: CourseStatus,
}

pub struct CourseRepository;

impl CourseRepository {
    pub async fn create(pool: &PgPool, new: &NewCourse) -> Result<Course, sqlx::Error> {
        let row = sqlx::query(&format!(
            "INSERT INTO courses_tb
                 (title, description, price, category, thumbnail, video, instructor_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(&new.thumbnail)
        .bind(&new.video)
        .bind(new.instructor_id)
        .bind(new.status.as_str())
        .fetch_one(pool)
        .await?;

        Ok(row_to_course(&row))
    }

    pub async fn get_by_id(pool: &PgPool, course_id: i64) -> Result<Option<Course>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses_tb WHERE course_id = $1"
        ))
        .bind(course_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_course(&r)))
    }

    /// Get a course only if it is owned by the given instructor.
    pub async fn get_owned(
        pool: &PgPool,
        course_id: i64,
        instructor_id: i64,
    ) -> Result<Option<Course>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses_tb
             WHERE course_id = $1 AND instructor_id = $2"
        ))
        .bind(course_id)
        .bind(instructor_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_course(&r)))
    }

    /// Published catalog with instructor names, newest first.
    pub async fn list_published(pool: &PgPool) -> Result<Vec<CourseSummary>, sqlx::Error> {
        let rows = sqlx::query(
            r#"SELECT c.course_id, c.title, c.description, c.price, c.category,
                      c.thumbnail, c.created_at, u.full_name AS instructor_name
               FROM courses_tb c
               JOIN users_tb u ON u.user_id = c.instructor_id
               WHERE c.status = 'published'
               ORDER BY c.created_at DESC"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| CourseSummary {
                course_id: r.get("course_id"),
                title: r.get("title"),
                description: r.get("description"),
                price: r.get("price"),
                category: r.get("category"),
                thumbnail: r.get("thumbnail"),
                instructor_name: r.get("instructor_name"),
                created_at: r.get("created_at"),
            })
            .collect())
    }

    pub async fn list_by_instructor(
        pool: &PgPool,
        instructor_id: i64,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses_tb
             WHERE instructor_id = $1 ORDER BY created_at DESC"
        ))
        .bind(instructor_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(row_to_course).collect())
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses_tb ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(row_to_course).collect())
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM courses_tb")
            .fetch_one(pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Update editable fields; `thumbnail`/`video` keep their previous
    /// value when None.
    pub async fn update(
        pool: &PgPool,
        course_id: i64,
        title: &str,
        description: &str,
        price: Decimal,
        status: CourseStatus,
        thumbnail: Option<&str>,
        video: Option<&str>,
    ) -> Result<Option<Course>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "UPDATE courses_tb
             SET title = $2, description = $3, price = $4, status = $5,
                 thumbnail = COALESCE($6, thumbnail),
                 video = COALESCE($7, video)
             WHERE course_id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(course_id)
        .bind(title)
        .bind(description)
        .bind(price)
        .bind(status.as_str())
        .bind(thumbnail)
        .bind(video)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_course(&r)))
    }

    pub async fn set_status(
        pool: &PgPool,
        course_id: i64,
        status: CourseStatus,
    ) -> Result<Option<Course>, sqlx::Error> {
        let row = sqlx::query(&format!(
            "UPDATE courses_tb SET status = $2 WHERE course_id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(course_id)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|r| row_to_course(&r)))
    }

    /// Delete the course row. Lessons, enrollments and payments cascade.
    pub async fn delete(pool: &PgPool, course_id: i64) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM courses_tb WHERE course_id = $1")
            .bind(course_id)
            .execute(pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

pub struct LessonRepository;

impl LessonRepository {
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: i64,
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT lesson_id, course_id, title, position, video_url, duration_minutes
             FROM lessons_tb WHERE course_id = $1 ORDER BY position",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Lesson {
                lesson_id: r.get("lesson_id"),
                course_id: r.get("course_id"),
                title: r.get("title"),
                position: r.get("position"),
                video_url: r.get("video_url"),
                duration_minutes: r.get("duration_minutes"),
            })
            .collect())
    }

    pub async fn count_for_course(pool: &PgPool, course_id: i64) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM lessons_tb WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await?;
        Ok(row.get("n"))
    }

    pub async fn add(
        pool: &PgPool,
        course_id: i64,
        title: &str,
        position: i32,
        video_url: &str,
        duration_minutes: Option<i32>,
    ) -> Result<Lesson, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO lessons_tb (course_id, title, position, video_url, duration_minutes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING lesson_id, course_id, title, position, video_url, duration_minutes",
        )
        .bind(course_id)
        .bind(title)
        .bind(position)
        .bind(video_url)
        .bind(duration_minutes)
        .fetch_one(pool)
        .await?;

        Ok(Lesson {
            lesson_id: row.get("lesson_id"),
            course_id: row.get("course_id"),
            title: row.get("title"),
            position: row.get("position"),
            video_url: row.get("video_url"),
            duration_minutes: row.get("duration_minutes"),
        })
    }
}
