//! Razorpay payment gateway adapter.
//!
//! Implements `PaymentGateway` over the Razorpay Orders API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RazorpayConfig::new(key_id, key_secret);
//! let gateway = RazorpayGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::ports::{CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentGatewayError};

const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API credentials.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (rzp_live_... or rzp_test_...), also handed to the widget.
    key_id: String,

    /// Key secret; signs completion callbacks.
    key_secret: SecretString,

    /// Base URL for the Razorpay API.
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn key_secret(&self) -> &str {
        self.key_secret.expose_secret()
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.api_base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Razorpay order creation body.
#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Razorpay order as returned by the API.
#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: i64,
    currency: String,
    receipt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    code: Option<String>,
    description: Option<String>,
}

/// Razorpay payment gateway adapter.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn key_id(&self) -> &str {
        self.config.key_id()
    }
}

/// Maps a non-success Razorpay response to a gateway error.
fn error_from_response(status: reqwest::StatusCode, body: &str) -> PaymentGatewayError {
    let detail = serde_json::from_str::<RazorpayErrorBody>(body).ok().map(|b| b.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.description.clone())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let error = if status == reqwest::StatusCode::UNAUTHORIZED {
        PaymentGatewayError::authentication(message)
    } else if status.is_client_error() {
        PaymentGatewayError::invalid_request(message)
    } else {
        PaymentGatewayError::provider(message)
    };

    match detail.and_then(|d| d.code) {
        Some(code) => error.with_provider_code(code),
        None => error,
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, PaymentGatewayError> {
        let body = OrderBody {
            amount: request.amount_minor_units,
            currency: &request.currency,
            receipt: &request.receipt,
        };

        let response = self
            .http_client
            .post(self.config.orders_url())
            .basic_auth(&self.config.key_id, Some(self.config.key_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentGatewayError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error = error_from_response(status, &error_text);
            tracing::error!(
                status = status.as_u16(),
                receipt = %request.receipt,
                error = %error,
                "Razorpay create_order failed"
            );
            return Err(error);
        }

        let order: RazorpayOrder = response.json().await.map_err(|e| {
            PaymentGatewayError::provider(format!("Invalid order response: {}", e))
        })?;

        tracing::debug!(gateway_order_id = %order.id, receipt = %request.receipt, "Razorpay order created");

        Ok(GatewayOrder {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
        })
    }
}
