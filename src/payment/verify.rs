//! Payment callback verification and the enrollment write.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use sqlx::PgPool;
use utoipa::ToSchema;

use super::models::PaymentStatus;
use crate::catalog::repository::CourseRepository;
use crate::enrollment::writer::{EnrollOutcome, EnrollmentWriter, VerifiedPayment};
use crate::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 over `orderId|paymentId`, keyed with the gateway secret.
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a supplied callback signature.
pub fn signature_matches(secret: &str, order_id: &str, payment_id: &str, supplied: &str) -> bool {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    match hex::decode(supplied) {
        Ok(bytes) => mac.verify_slice(&bytes).is_ok(),
        Err(_) => false,
    }
}

/// Callback payload delivered after checkout completes.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(rename = "courseId")]
    pub course_id: i64,
}

pub struct VerificationService;

impl VerificationService {
    /// Verify the callback signature, then record payment + enrollment.
    ///
    /// A signature mismatch fails with `InvalidSignature` before any row
    /// is touched. On a match the write is a single transaction with
    /// conditional inserts, so a replayed or concurrent callback for the
    /// same order settles into exactly one payment and one enrollment.
    pub async fn verify_and_enroll(
        pool: &PgPool,
        gateway_secret: &str,
        user_id: i64,
        req: &VerifyPaymentRequest,
    ) -> Result<EnrollOutcome, ApiError> {
        if req.razorpay_order_id.is_empty()
            || req.razorpay_payment_id.is_empty()
            || req.razorpay_signature.is_empty()
        {
            return Err(ApiError::InvalidParameter(
                "order id, payment id and signature are required".to_string(),
            ));
        }

        if !signature_matches(
            gateway_secret,
            &req.razorpay_order_id,
            &req.razorpay_payment_id,
            &req.razorpay_signature,
        ) {
            tracing::warn!(
                user_id,
                order_id = %req.razorpay_order_id,
                "payment signature mismatch"
            );
            return Err(ApiError::InvalidSignature);
        }

        let course = CourseRepository::get_by_id(pool, req.course_id)
            .await?
            .ok_or(ApiError::NotFound("course"))?;

        let payment = VerifiedPayment {
            user_id,
            course_id: course.course_id,
            instructor_id: course.instructor_id,
            amount: course.price,
            gateway_order_id: &req.razorpay_order_id,
            gateway_payment_id: &req.razorpay_payment_id,
        };

        let outcome = EnrollmentWriter::enroll_with_payment(pool, &payment).await?;
        match outcome {
            EnrollOutcome::Enrolled => {
                tracing::info!(
                    user_id,
                    course_id = course.course_id,
                    order_id = %req.razorpay_order_id,
                    status = ?PaymentStatus::Success,
                    "payment verified, enrollment recorded"
                );
            }
            EnrollOutcome::AlreadyEnrolled => {
                tracing::info!(
                    user_id,
                    course_id = course.course_id,
                    order_id = %req.razorpay_order_id,
                    "duplicate verification ignored, already enrolled"
                );
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Known vector: HMAC-SHA256 with key "s" over "o1|p1".
    const KNOWN_SIG: &str = "a23a35a9cc17304682813499f610ed21e20e5e98e04bc2fbe9a198a68b058546";

    #[test]
    fn test_expected_signature_known_vector() {
        assert_eq!(expected_signature("s", "o1", "p1"), KNOWN_SIG);
    }

    #[test]
    fn test_signature_accepts_only_exact_match() {
        assert!(signature_matches("s", "o1", "p1", KNOWN_SIG));
        assert!(!signature_matches("s", "o1", "p1", &KNOWN_SIG.replace('a', "b")));
        assert!(!signature_matches("s", "o1", "p2", KNOWN_SIG));
        assert!(!signature_matches("wrong", "o1", "p1", KNOWN_SIG));
    }

    #[test]
    fn test_signature_rejects_non_hex_input() {
        assert!(!signature_matches("s", "o1", "p1", "not-hex!"));
        assert!(!signature_matches("s", "o1", "p1", ""));
    }

    #[test]
    fn test_signature_covers_separator() {
        // "o1|p1" must not collide with e.g. "o1p|1".
        let a = expected_signature("s", "o1", "p1");
        let b = expected_signature("s", "o1p", "1");
        assert_ne!(a, b);
    }
}
