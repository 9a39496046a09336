//! Order creation for course purchases.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use super::gateway::PaymentGateway;
use crate::catalog::models::CourseStatus;
use crate::catalog::repository::CourseRepository;
use crate::enrollment::writer::EnrollmentWriter;
use crate::error::ApiError;

/// Response for a created purchase order.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub course_id: i64,
    /// Public key the client needs to open the checkout widget.
    pub gateway_key_id: String,
}

/// Convert a major-unit price to gateway minor units (price x 100, rounded).
pub fn to_minor_units(price: Decimal) -> Result<i64, ApiError> {
    let minor = (price * Decimal::from(100)).round();
    minor
        .to_i64()
        .filter(|n| *n > 0)
        .ok_or_else(|| ApiError::InvalidState(format!("invalid course price: {price}")))
}

/// Bounded-length caller reference: `rcpt_` + last 6 digits of course and
/// user ids + last 10 digits of a millisecond timestamp. Worst case is 29
/// characters, inside the gateway's 40-char receipt limit.
pub fn build_receipt(course_id: i64, user_id: i64, now_millis: i64) -> String {
    fn tail(s: String, n: usize) -> String {
        let start = s.len().saturating_sub(n);
        s[start..].to_string()
    }
    format!(
        "rcpt_{}_{}_{}",
        tail(course_id.to_string(), 6),
        tail(user_id.to_string(), 6),
        tail(now_millis.to_string(), 10)
    )
}

pub struct OrderService;

impl OrderService {
    /// Create a gateway order for `course_id` on behalf of `user_id`.
    ///
    /// The course must exist, be published and carry a positive price, and
    /// the buyer must not already hold an enrollment. The gateway call is
    /// not retried; its failure surfaces as `Upstream`.
    pub async fn create_order(
        pool: &PgPool,
        gateway: &dyn PaymentGateway,
        gateway_key_id: &str,
        currency: &str,
        user_id: i64,
        course_id: i64,
    ) -> Result<CreateOrderResponse, ApiError> {
        let course = CourseRepository::get_by_id(pool, course_id)
            .await?
            .ok_or(ApiError::NotFound("course"))?;

        if course.status != CourseStatus::Published {
            return Err(ApiError::InvalidState(
                "course is not open for enrollment".to_string(),
            ));
        }

        let amount_minor = to_minor_units(course.price)?;

        if EnrollmentWriter::is_enrolled(pool, course_id, user_id).await? {
            return Err(ApiError::InvalidState(
                "already enrolled in this course".to_string(),
            ));
        }

        let receipt = build_receipt(course_id, user_id, chrono::Utc::now().timestamp_millis());
        let order = gateway.create_order(amount_minor, currency, &receipt).await?;

        tracing::info!(
            user_id,
            course_id,
            order_id = %order.id,
            amount = order.amount,
            "purchase order created"
        );

        Ok(CreateOrderResponse {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            course_id,
            gateway_key_id: gateway_key_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_minor_units_conversion() {
        // 499.00 currency units => 49900 paise
        let price = Decimal::from_str("499.00").unwrap();
        assert_eq!(to_minor_units(price).unwrap(), 49900);
    }

    #[test]
    fn test_minor_units_rounding() {
        let price = Decimal::from_str("499.999").unwrap();
        assert_eq!(to_minor_units(price).unwrap(), 50000);
    }

    #[test]
    fn test_minor_units_rejects_non_positive() {
        assert!(to_minor_units(Decimal::ZERO).is_err());
        assert!(to_minor_units(Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn test_receipt_shape_and_length() {
        let receipt = build_receipt(123456789, 42, 1_700_000_000_123);
        assert!(receipt.starts_with("rcpt_"));
        assert!(receipt.len() <= 40, "receipt too long: {receipt}");
        // last 6 of course id, full short user id, last 10 of timestamp
        assert_eq!(receipt, "rcpt_456789_42_0000000123");
    }

    #[test]
    fn test_receipt_bounded_for_large_ids() {
        let receipt = build_receipt(i64::MAX, i64::MAX, i64::MAX);
        assert!(receipt.len() <= 40);
    }
}
