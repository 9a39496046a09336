//! Payment gateway client.
//!
//! The gateway sits behind a trait so the order flow can run against a
//! mock in tests and development. The real client speaks the Razorpay
//! orders API with basic auth and a hard request timeout; calls are never
//! retried automatically (a retried order-create could mint a duplicate
//! order).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::RazorpayConfig;
use crate::error::ApiError;

/// Order as returned by the gateway's order-create call.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for `amount_minor` in `currency`. `receipt` is an
    /// opaque caller reference of at most 40 characters.
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, ApiError>;
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Deserialize)]
struct GatewayErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

/// HTTP client for the Razorpay orders API.
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(config: &RazorpayConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("http client init failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, ApiError> {
        let url = format!("{}/v1/orders", self.base_url);
        let body = CreateOrderBody {
            amount: amount_minor,
            currency,
            receipt,
        };

        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Upstream {
                code: "NETWORK_ERROR".to_string(),
                description: e.to_string(),
            })?;

        if resp.status().is_success() {
            let order: GatewayOrder = resp.json().await.map_err(|e| ApiError::Upstream {
                code: "BAD_RESPONSE".to_string(),
                description: format!("malformed order response: {e}"),
            })?;
            tracing::info!(order_id = %order.id, amount = order.amount, "gateway order created");
            Ok(order)
        } else {
            let status = resp.status();
            let detail = resp
                .json::<GatewayErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| GatewayErrorDetail {
                    code: status.as_str().to_string(),
                    description: "gateway returned an unparseable error".to_string(),
                });
            tracing::warn!(code = %detail.code, "gateway order creation failed");
            Err(ApiError::Upstream {
                code: detail.code,
                description: detail.description,
            })
        }
    }
}

/// In-process gateway used by tests and local development.
///
/// Mints sequential order ids and echoes the requested amount/currency.
pub struct MockGateway {
    seq: AtomicU64,
    /// When set, every call fails with this provider code.
    pub fail_with: Option<String>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
            fail_with: None,
        }
    }

    pub fn failing(code: &str) -> Self {
        Self {
            seq: AtomicU64::new(1),
            fail_with: Some(code.to_string()),
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        _receipt: &str,
    ) -> Result<GatewayOrder, ApiError> {
        if let Some(code) = &self.fail_with {
            return Err(ApiError::Upstream {
                code: code.clone(),
                description: "mock gateway configured to fail".to_string(),
            });
        }
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayOrder {
            id: format!("order_mock{n:08}"),
            amount: amount_minor,
            currency: currency.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_sequential_ids() {
        let gw = MockGateway::new();
        let a = gw.create_order(49900, "INR", "rcpt_a").await.unwrap();
        let b = gw.create_order(100, "INR", "rcpt_b").await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.amount, 49900);
        assert_eq!(a.currency, "INR");
    }

    #[tokio::test]
    async fn test_mock_gateway_failure_propagates_code() {
        let gw = MockGateway::failing("BAD_REQUEST_ERROR");
        let err = gw.create_order(100, "INR", "rcpt").await.unwrap_err();
        match err {
            ApiError::Upstream { code, .. } => assert_eq!(code, "BAD_REQUEST_ERROR"),
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }
}
