//! Payment gateway port.
//!
//! Creates orders with an external payment gateway. The customer pays
//! against the returned order id through the gateway's checkout widget,
//! which later posts the payment id and signature back to us.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the given amount.
    async fn create_order(&self, request: CreateOrderRequest)
        -> Result<GatewayOrder, PaymentGatewayError>;
}

/// Request to create a gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in the currency's minor unit (paise for INR).
    pub amount_minor_units: i64,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Our internal order id, echoed back by the gateway.
    pub receipt: String,
}

/// Order as created by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
}

/// Gateway error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentGatewayErrorCode {
    /// Network or connection failure.
    Network,
    /// Credentials rejected.
    Authentication,
    /// Request rejected by the gateway.
    InvalidRequest,
    /// Unexpected response body or status.
    Provider,
}

impl std::fmt::Display for PaymentGatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentGatewayErrorCode::Network => "network_error",
            PaymentGatewayErrorCode::Authentication => "authentication_error",
            PaymentGatewayErrorCode::InvalidRequest => "invalid_request",
            PaymentGatewayErrorCode::Provider => "provider_error",
        };
        write!(f, "{}", s)
    }
}

/// Error returned by a payment gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentGatewayError {
    pub code: PaymentGatewayErrorCode,
    pub message: String,
    /// Gateway's own error code, when it sent one.
    pub provider_code: Option<String>,
}

impl PaymentGatewayError {
    pub fn new(code: PaymentGatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentGatewayErrorCode::Network, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentGatewayErrorCode::Authentication, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentGatewayErrorCode::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentGatewayErrorCode::Provider, message)
    }
}

impl std::fmt::Display for PaymentGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentGatewayError {}
