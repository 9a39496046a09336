//! Payment endpoints: order creation and callback verification.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::order::{CreateOrderResponse, OrderService};
use super::verify::{VerificationService, VerifyPaymentRequest};
use crate::auth::service::Claims;
use crate::error::ApiError;
use crate::gateway::{state::AppState, types::ApiResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "courseId")]
    pub course_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
}

/// Create a gateway order for a course purchase
///
/// POST /api/v1/payments/create-order
#[utoipa::path(
    post,
    path = "/api/v1/payments/create-order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = ApiResponse<CreateOrderResponse>),
        (status = 400, description = "Already enrolled or invalid price"),
        (status = 404, description = "Course not found"),
        (status = 502, description = "Payment gateway failure")
    ),
    tag = "Payments"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<ApiResponse<CreateOrderResponse>>, ApiError> {
    let resp = OrderService::create_order(
        state.pool(),
        state.payment_gateway.as_ref(),
        &state.gateway_key_id,
        &state.currency,
        claims.user_id()?,
        req.course_id,
    )
    .await?;
    Ok(Json(ApiResponse::success(resp)))
}

/// Verify a payment callback and enroll the buyer
///
/// POST /api/v1/payments/verify-payment
#[utoipa::path(
    post,
    path = "/api/v1/payments/verify-payment",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified, enrollment recorded",
         body = ApiResponse<VerifyPaymentResponse>),
        (status = 400, description = "Invalid signature"),
        (status = 404, description = "Course not found")
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<VerifyPaymentResponse>>, ApiError> {
    let outcome = VerificationService::verify_and_enroll(
        state.pool(),
        &state.gateway_secret,
        claims.user_id()?,
        &req,
    )
    .await?;

    let message = match outcome {
        crate::enrollment::EnrollOutcome::Enrolled => {
            "payment successful and enrollment completed".to_string()
        }
        crate::enrollment::EnrollOutcome::AlreadyEnrolled => {
            "payment already processed, enrollment unchanged".to_string()
        }
    };

    Ok(Json(ApiResponse::success(VerifyPaymentResponse {
        success: true,
        message,
    })))
}
