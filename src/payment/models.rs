//! Payment records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Row};
use utoipa::ToSchema;

/// Payment status, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> PaymentStatus {
        match s {
            "success" => PaymentStatus::Success,
            "failed" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

/// Payment row, created once per verified callback.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Payment {
    pub payment_id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    #[schema(value_type = String, example = "499.00")]
    pub amount: Decimal,
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Payment>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT payment_id, user_id, course_id, instructor_id, amount,
                    gateway_order_id, gateway_payment_id, status, created_at
             FROM payments_tb ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Payment {
                payment_id: r.get("payment_id"),
                user_id: r.get("user_id"),
                course_id: r.get("course_id"),
                instructor_id: r.get("instructor_id"),
                amount: r.get("amount"),
                gateway_order_id: r.get("gateway_order_id"),
                gateway_payment_id: r.get("gateway_payment_id"),
                status: PaymentStatus::parse(r.get::<&str, _>("status")),
                created_at: r.get("created_at"),
            })
            .collect())
    }

    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM payments_tb")
            .fetch_one(pool)
            .await?;
        Ok(row.get("n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(PaymentStatus::parse("success"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::parse("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::parse("weird"), PaymentStatus::Pending);
    }
}
