//! Dashboard statistics. Read-only: nothing here mutates enrollment state.
//!
//! Instructor student totals are the set union of enrollment facts and
//! successful payment records. The two can diverge (a manually granted
//! enrollment has no payment row) and the union keeps either signal
//! visible.
//!
//! Known inconsistency, kept on purpose: instructor revenue counts only
//! `success` payments while the admin platform total sums every payment
//! row regardless of status. See the test fixtures below.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::account::models::Role;
use crate::account::repository::UserRepository;
use crate::catalog::repository::CourseRepository;
use crate::enrollment::progress::learning_hours;
use crate::enrollment::writer::EnrollmentWriter;
use crate::error::ApiError;
use crate::payment::models::{PaymentRepository, PaymentStatus};

/// Minimal payment projection used by the reducers.
#[derive(Debug, Clone)]
pub struct PaymentFact {
    pub user_id: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

/// Union of enrolled students and paying students.
pub fn unique_student_count(enrolled: &[i64], payments: &[PaymentFact]) -> usize {
    let mut students: HashSet<i64> = enrolled.iter().copied().collect();
    for p in payments {
        if p.status == PaymentStatus::Success {
            students.insert(p.user_id);
        }
    }
    students.len()
}

/// Instructor revenue: successful payments only.
pub fn revenue_success_only(payments: &[PaymentFact]) -> Decimal {
    payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Success)
        .map(|p| p.amount)
        .sum()
}

/// Platform revenue: every payment row, status ignored.
pub fn revenue_all_statuses(payments: &[PaymentFact]) -> Decimal {
    payments.iter().map(|p| p.amount).sum()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorStats {
    pub total_courses: i64,
    pub total_students: i64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_courses: i64,
    pub total_instructors: i64,
    pub total_payments: i64,
    #[schema(value_type = String)]
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentStats {
    pub enrolled_courses: i64,
    pub completed_lessons: i64,
    pub learning_hours: i64,
}

fn row_to_fact(r: &sqlx::postgres::PgRow) -> PaymentFact {
    PaymentFact {
        user_id: r.get("user_id"),
        amount: r.get("amount"),
        status: PaymentStatus::parse(r.get::<&str, _>("status")),
    }
}

async fn payment_facts_for_instructor(
    pool: &PgPool,
    instructor_id: i64,
) -> Result<Vec<PaymentFact>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT user_id, amount, status FROM payments_tb WHERE instructor_id = $1",
    )
    .bind(instructor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_fact).collect())
}

async fn payment_facts_all(pool: &PgPool) -> Result<Vec<PaymentFact>, sqlx::Error> {
    let rows = sqlx::query("SELECT user_id, amount, status FROM payments_tb")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(row_to_fact).collect())
}

/// Instructor dashboard: owned courses, distinct students, revenue.
pub async fn instructor_stats(
    pool: &PgPool,
    instructor_id: i64,
) -> Result<InstructorStats, ApiError> {
    let courses = CourseRepository::list_by_instructor(pool, instructor_id).await?;
    if courses.is_empty() {
        return Ok(InstructorStats {
            total_courses: 0,
            total_students: 0,
            total_revenue: Decimal::ZERO,
        });
    }

    let course_ids: Vec<i64> = courses.iter().map(|c| c.course_id).collect();
    let enrolled = EnrollmentWriter::students_for_courses(pool, &course_ids).await?;
    let payments = payment_facts_for_instructor(pool, instructor_id).await?;

    Ok(InstructorStats {
        total_courses: courses.len() as i64,
        total_students: unique_student_count(&enrolled, &payments) as i64,
        total_revenue: revenue_success_only(&payments),
    })
}

/// Platform dashboard for admins.
pub async fn admin_stats(pool: &PgPool) -> Result<AdminStats, ApiError> {
    let (total_users, total_instructors, total_courses, total_payments) = futures::try_join!(
        UserRepository::count_by_role(pool, Role::User),
        UserRepository::count_by_role(pool, Role::Instructor),
        CourseRepository::count_all(pool),
        PaymentRepository::count_all(pool),
    )?;

    // Platform total intentionally sums all statuses (see module docs).
    let payments = payment_facts_all(pool).await?;
    let total_revenue = revenue_all_statuses(&payments);

    Ok(AdminStats {
        total_users,
        total_courses,
        total_instructors,
        total_payments,
        total_revenue,
    })
}

/// Student dashboard: enrollment count, completed lessons, learning hours.
pub async fn student_stats(pool: &PgPool, user_id: i64) -> Result<StudentStats, ApiError> {
    let row = sqlx::query(
        "SELECT COUNT(DISTINCT e.enrollment_id) AS enrolled,
                COUNT(lc.lesson_id) AS completed
         FROM enrollments_tb e
         LEFT JOIN lesson_completions_tb lc ON lc.enrollment_id = e.enrollment_id
         WHERE e.student_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let enrolled: i64 = row.get("enrolled");
    let completed: i64 = row.get("completed");

    Ok(StudentStats {
        enrolled_courses: enrolled,
        completed_lessons: completed,
        learning_hours: learning_hours(completed as usize),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fact(user_id: i64, amount: &str, status: PaymentStatus) -> PaymentFact {
        PaymentFact {
            user_id,
            amount: Decimal::from_str(amount).unwrap(),
            status,
        }
    }

    /// One success (100), one failed (50). The instructor view and the
    /// platform view disagree on purpose.
    #[test]
    fn test_revenue_views_diverge_by_status_filter() {
        let payments = vec![
            fact(1, "100", PaymentStatus::Success),
            fact(2, "50", PaymentStatus::Failed),
        ];
        assert_eq!(revenue_success_only(&payments), Decimal::from(100));
        assert_eq!(revenue_all_statuses(&payments), Decimal::from(150));
    }

    /// The two student sources can diverge; the union counts either.
    #[test]
    fn test_student_union_reconciles_divergent_sources() {
        // user 1: enrolled with a payment record (in both sources)
        // user 2: enrolled without any payment row (manual grant)
        // user 3: paid but never made it into the fact table
        let enrolled = vec![1, 2];
        let payments = vec![
            fact(1, "100", PaymentStatus::Success),
            fact(3, "100", PaymentStatus::Success),
        ];
        assert_eq!(unique_student_count(&enrolled, &payments), 3);
    }

    #[test]
    fn test_student_union_ignores_failed_payments() {
        let payments = vec![fact(7, "100", PaymentStatus::Failed)];
        assert_eq!(unique_student_count(&[], &payments), 0);
    }

    #[test]
    fn test_student_union_deduplicates() {
        let enrolled = vec![1, 1, 2];
        let payments = vec![
            fact(1, "100", PaymentStatus::Success),
            fact(2, "100", PaymentStatus::Success),
        ];
        assert_eq!(unique_student_count(&enrolled, &payments), 2);
    }

    #[test]
    fn test_empty_revenue_is_zero() {
        assert_eq!(revenue_success_only(&[]), Decimal::ZERO);
        assert_eq!(revenue_all_statuses(&[]), Decimal::ZERO);
    }
}
