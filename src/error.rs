//! Unified error taxonomy for all API operations.
//!
//! Every service returns `ApiError`; the `IntoResponse` impl maps each
//! variant to an HTTP status plus a stable numeric code inside the
//! `ApiResponse` envelope. Server-side failures are logged here and
//! surfaced to clients with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::gateway::types::{ApiResponse, error_codes};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Operation is not valid for the current record state
    /// (already enrolled, non-positive price, draft course, ...).
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("invalid payment signature")]
    InvalidSignature,

    /// Payment gateway rejected or failed the call; carries the
    /// provider's error code and description.
    #[error("payment gateway error [{code}]: {description}")]
    Upstream { code: String, description: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidState(_) | Self::InvalidParameter(_) | Self::InvalidSignature => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound(_) => error_codes::NOT_FOUND,
            Self::Unauthorized(_) => error_codes::AUTH_FAILED,
            Self::Forbidden(_) => error_codes::FORBIDDEN,
            Self::InvalidState(_) => error_codes::INVALID_STATE,
            Self::InvalidParameter(_) => error_codes::INVALID_PARAMETER,
            Self::InvalidSignature => error_codes::INVALID_SIGNATURE,
            Self::Upstream { .. } => error_codes::UPSTREAM_ERROR,
            Self::Database(_) | Self::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        // Storage and internal failures keep details out of the response body.
        let msg = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ApiResponse::<()>::error(self.code(), msg);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound("course").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidSignature.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream {
                code: "BAD_REQUEST_ERROR".into(),
                description: "amount too small".into()
            }
            .http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::InvalidSignature.code(), error_codes::INVALID_SIGNATURE);
        assert_eq!(
            ApiError::InvalidState("already enrolled".into()).code(),
            error_codes::INVALID_STATE
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::NotFound("course").to_string(), "course not found");
        let err = ApiError::Upstream {
            code: "GATEWAY_ERROR".into(),
            description: "order creation failed".into(),
        };
        assert!(err.to_string().contains("GATEWAY_ERROR"));
    }
}
