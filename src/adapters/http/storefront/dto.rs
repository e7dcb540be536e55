//! HTTP DTOs (Data Transfer Objects) for storefront endpoints.
//!
//! These types define the JSON request/response structure for the storefront
//! API. Verification request fields use the names the checkout widget posts.

use crate::application::handlers::storefront::{
    ConfirmPaymentResult, InitiatePurchaseResult, LookupCredentialsResult, ProvisioningOutcome,
};
use crate::domain::storefront::{IssuedCredentials, Plan, PLAN_CURRENCY};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start a purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePurchaseRequest {
    /// Catalog plan id, e.g. `1TB`.
    #[serde(alias = "plan")]
    pub plan_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Completion callback as delivered by the checkout widget.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub storage: String,
    /// Whole rupees.
    pub price: i64,
    pub currency: String,
    pub features: Vec<String>,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            storage: plan.storage,
            price: plan.price,
            currency: PLAN_CURRENCY.to_string(),
            features: plan.features,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanResponse>,
}

/// One-time credential disclosure.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsResponse {
    pub username: String,
    pub password: String,
}

impl From<IssuedCredentials> for CredentialsResponse {
    fn from(credentials: IssuedCredentials) -> Self {
        Self {
            username: credentials.username.to_string(),
            password: credentials.password.expose().to_string(),
        }
    }
}

/// What the checkout widget needs to open.
#[derive(Debug, Clone, Serialize)]
pub struct InitiatePurchaseResponse {
    pub order_id: String,
    pub gateway_order_id: String,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub credentials: Option<CredentialsResponse>,
}

impl From<InitiatePurchaseResult> for InitiatePurchaseResponse {
    fn from(result: InitiatePurchaseResult) -> Self {
        Self {
            order_id: result.order_id.to_string(),
            gateway_order_id: result.gateway_order_id,
            amount: result.amount_minor_units,
            currency: result.currency,
            key_id: result.key_id,
            credentials: result.credentials.map(CredentialsResponse::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningResponse {
    /// `provisioned` or `failed`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ProvisioningOutcome> for ProvisioningResponse {
    fn from(outcome: ProvisioningOutcome) -> Self {
        match outcome {
            ProvisioningOutcome::Provisioned => Self {
                status: "provisioned".to_string(),
                reason: None,
            },
            ProvisioningOutcome::Failed { reason } => Self {
                status: "failed".to_string(),
                reason: Some(reason),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmPaymentResponse {
    pub status: String,
    pub credentials: CredentialsResponse,
    pub plan_id: String,
    pub next_maintenance_at: String,
    pub provisioning: ProvisioningResponse,
}

impl From<ConfirmPaymentResult> for ConfirmPaymentResponse {
    fn from(result: ConfirmPaymentResult) -> Self {
        Self {
            status: result.status.to_string(),
            credentials: result.credentials.into(),
            plan_id: result.account.plan_id.to_string(),
            next_maintenance_at: result.account.next_maintenance_at.to_rfc3339(),
            provisioning: result.provisioning.into(),
        }
    }
}

/// Account details; never includes a password.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub username: String,
    pub plan_id: String,
    pub purchased_at: String,
    pub next_maintenance_at: String,
    pub payment_status: String,
    pub provisioned: bool,
}

impl From<LookupCredentialsResult> for AccountResponse {
    fn from(result: LookupCredentialsResult) -> Self {
        Self {
            username: result.username.to_string(),
            plan_id: result.plan_id.to_string(),
            purchased_at: result.purchased_at.to_rfc3339(),
            next_maintenance_at: result.next_maintenance_at.to_rfc3339(),
            payment_status: result.payment_status.to_string(),
            provisioned: result.provisioned,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}
