//! Idempotent enrollment and lesson-progress writes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};
use utoipa::ToSchema;

use super::progress::progress_pct;

/// Result of an enrollment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// A new enrollment fact was written together with its payment row.
    Enrolled,
    /// The (course, student) fact already existed; nothing was written.
    AlreadyEnrolled,
}

/// Payment fields captured at verification time.
#[derive(Debug)]
pub struct VerifiedPayment<'a> {
    pub user_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub amount: Decimal,
    pub gateway_order_id: &'a str,
    pub gateway_payment_id: &'a str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompletedLesson {
    pub lesson_id: i64,
    pub completed_at: DateTime<Utc>,
}

/// Progress state returned after each mutation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressSnapshot {
    pub progress: i32,
    pub completed_lessons: Vec<CompletedLesson>,
}

pub struct EnrollmentWriter;

impl EnrollmentWriter {
    pub async fn is_enrolled(
        pool: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT 1 AS one FROM enrollments_tb WHERE course_id = $1 AND student_id = $2",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.is_some())
    }

    /// Write the enrollment fact without a payment record (free or
    /// manually granted enrollment). A conditional insert, so repeating
    /// the call for the same (course, student) pair is a no-op.
    pub async fn enroll(
        pool: &PgPool,
        course_id: i64,
        student_id: i64,
    ) -> Result<EnrollOutcome, sqlx::Error> {
        let inserted = sqlx::query(
            "INSERT INTO enrollments_tb (course_id, student_id)
             VALUES ($1, $2)
             ON CONFLICT (course_id, student_id) DO NOTHING",
        )
        .bind(course_id)
        .bind(student_id)
        .execute(pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            Ok(EnrollOutcome::AlreadyEnrolled)
        } else {
            Ok(EnrollOutcome::Enrolled)
        }
    }

    /// Write the enrollment fact and its payment record as one transaction.
    ///
    /// Both inserts are conditional (`ON CONFLICT DO NOTHING`), so two
    /// concurrent verifications of the same callback commit exactly one
    /// enrollment row and one payment row between them. A repeat call for
    /// an already-enrolled student is a no-op reported as such.
    pub async fn enroll_with_payment(
        pool: &PgPool,
        payment: &VerifiedPayment<'_>,
    ) -> Result<EnrollOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let enrolled = sqlx::query(
            "INSERT INTO enrollments_tb (course_id, student_id)
             VALUES ($1, $2)
             ON CONFLICT (course_id, student_id) DO NOTHING",
        )
        .bind(payment.course_id)
        .bind(payment.user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if enrolled == 0 {
            tx.rollback().await?;
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        // Unique gateway_order_id guards against a duplicate payment row
        // when the same order is replayed for a different course/user pair.
        sqlx::query(
            "INSERT INTO payments_tb
                 (user_id, course_id, instructor_id, amount,
                  gateway_order_id, gateway_payment_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, 'success')
             ON CONFLICT (gateway_order_id) DO NOTHING",
        )
        .bind(payment.user_id)
        .bind(payment.course_id)
        .bind(payment.instructor_id)
        .bind(payment.amount)
        .bind(payment.gateway_order_id)
        .bind(payment.gateway_payment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(EnrollOutcome::Enrolled)
    }

    /// Mark a lesson complete or incomplete and recompute progress.
    ///
    /// Returns None when the student has no enrollment for the course.
    /// Completing an already-completed lesson is a no-op; progress is
    /// recomputed from counts on every call, never incremented.
    pub async fn set_lesson_completion(
        pool: &PgPool,
        course_id: i64,
        student_id: i64,
        lesson_id: i64,
        completed: bool,
    ) -> Result<Option<ProgressSnapshot>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let enrollment = sqlx::query(
            "SELECT enrollment_id FROM enrollments_tb
             WHERE course_id = $1 AND student_id = $2
             FOR UPDATE",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(enrollment) = enrollment else {
            tx.rollback().await?;
            return Ok(None);
        };
        let enrollment_id: i64 = enrollment.get("enrollment_id");

        if completed {
            // The lesson must belong to this course; foreign lesson ids
            // are silently ignored rather than recorded.
            sqlx::query(
                "INSERT INTO lesson_completions_tb (enrollment_id, lesson_id)
                 SELECT $1, lesson_id FROM lessons_tb
                 WHERE lesson_id = $2 AND course_id = $3
                 ON CONFLICT (enrollment_id, lesson_id) DO NOTHING",
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                "DELETE FROM lesson_completions_tb
                 WHERE enrollment_id = $1 AND lesson_id = $2",
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .execute(&mut *tx)
            .await?;
        }

        let total: i64 = sqlx::query("SELECT COUNT(*) AS n FROM lessons_tb WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&mut *tx)
            .await?
            .get("n");

        let done: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM lesson_completions_tb WHERE enrollment_id = $1")
                .bind(enrollment_id)
                .fetch_one(&mut *tx)
                .await?
                .get("n");

        let pct = progress_pct(done as usize, total as usize);

        sqlx::query("UPDATE enrollments_tb SET progress = $2 WHERE enrollment_id = $1")
            .bind(enrollment_id)
            .bind(pct)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query(
            "SELECT lesson_id, completed_at FROM lesson_completions_tb
             WHERE enrollment_id = $1 ORDER BY completed_at",
        )
        .bind(enrollment_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(ProgressSnapshot {
            progress: pct,
            completed_lessons: rows
                .iter()
                .map(|r| CompletedLesson {
                    lesson_id: r.get("lesson_id"),
                    completed_at: r.get("completed_at"),
                })
                .collect(),
        }))
    }

    /// Student ids enrolled in any of the given courses.
    pub async fn students_for_courses(
        pool: &PgPool,
        course_ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT student_id FROM enrollments_tb WHERE course_id = ANY($1)",
        )
        .bind(course_ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(|r| r.get("student_id")).collect())
    }
}
