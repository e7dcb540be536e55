//! Storefront-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | DuplicateAccount | 409 |
//! | AccountConflict | 409 |
//! | InvalidPaymentState | 409 |
//! | UnknownPlan | 400 |
//! | SignatureMismatch | 400 |
//! | ValidationFailed | 400 |
//! | PaymentNotFound | 404 |
//! | AccountNotFound | 404 |
//! | OrderCreationFailed | 502 |
//! | ProvisioningFailed | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, ValidationError};

use super::{CanonicalEmail, PaymentStatus};

/// Errors raised by the purchase workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontError {
    /// An account already exists for this canonical email.
    DuplicateAccount(CanonicalEmail),

    /// The requested plan is not in the catalog.
    UnknownPlan(String),

    /// The payment gateway refused or failed to create the order.
    OrderCreationFailed { reason: String },

    /// No purchase attempt is recorded for this gateway order id.
    PaymentNotFound(String),

    /// The callback signature did not verify; the payment is now failed.
    SignatureMismatch { gateway_order_id: String },

    /// The payment is not in a state that allows the requested step.
    InvalidPaymentState {
        gateway_order_id: String,
        status: PaymentStatus,
    },

    /// Another payment committed an account for the same email first.
    AccountConflict(CanonicalEmail),

    /// The external directory did not create the account.
    ProvisioningFailed { account_id: AccountId, reason: String },

    /// No account exists for this email.
    AccountNotFound(String),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl StorefrontError {
    pub fn duplicate_account(email: CanonicalEmail) -> Self {
        StorefrontError::DuplicateAccount(email)
    }

    pub fn unknown_plan(plan_id: impl Into<String>) -> Self {
        StorefrontError::UnknownPlan(plan_id.into())
    }

    pub fn order_creation_failed(reason: impl Into<String>) -> Self {
        StorefrontError::OrderCreationFailed {
            reason: reason.into(),
        }
    }

    pub fn payment_not_found(gateway_order_id: impl Into<String>) -> Self {
        StorefrontError::PaymentNotFound(gateway_order_id.into())
    }

    pub fn signature_mismatch(gateway_order_id: impl Into<String>) -> Self {
        StorefrontError::SignatureMismatch {
            gateway_order_id: gateway_order_id.into(),
        }
    }

    pub fn invalid_payment_state(gateway_order_id: impl Into<String>, status: PaymentStatus) -> Self {
        StorefrontError::InvalidPaymentState {
            gateway_order_id: gateway_order_id.into(),
            status,
        }
    }

    pub fn account_conflict(email: CanonicalEmail) -> Self {
        StorefrontError::AccountConflict(email)
    }

    pub fn provisioning_failed(account_id: AccountId, reason: impl Into<String>) -> Self {
        StorefrontError::ProvisioningFailed {
            account_id,
            reason: reason.into(),
        }
    }

    pub fn account_not_found(email: impl Into<String>) -> Self {
        StorefrontError::AccountNotFound(email.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StorefrontError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        StorefrontError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            StorefrontError::DuplicateAccount(_) | StorefrontError::AccountConflict(_) => {
                ErrorCode::AccountExists
            }
            StorefrontError::UnknownPlan(_) => ErrorCode::UnknownPlan,
            StorefrontError::OrderCreationFailed { .. } => ErrorCode::PaymentGatewayError,
            StorefrontError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            StorefrontError::SignatureMismatch { .. } => ErrorCode::SignatureMismatch,
            StorefrontError::InvalidPaymentState { .. } => ErrorCode::InvalidStateTransition,
            StorefrontError::ProvisioningFailed { .. } => ErrorCode::DirectoryError,
            StorefrontError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            StorefrontError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            StorefrontError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            StorefrontError::DuplicateAccount(email) => {
                format!("Email already registered: {}", email)
            }
            StorefrontError::UnknownPlan(plan) => format!("Unknown plan: {}", plan),
            StorefrontError::OrderCreationFailed { reason } => {
                format!("Failed to create order: {}", reason)
            }
            StorefrontError::PaymentNotFound(order) => format!("Payment not found: {}", order),
            StorefrontError::SignatureMismatch { gateway_order_id } => {
                format!("Payment verification failed for order {}", gateway_order_id)
            }
            StorefrontError::InvalidPaymentState {
                gateway_order_id,
                status,
            } => format!("Payment for order {} is {}", gateway_order_id, status),
            StorefrontError::AccountConflict(email) => {
                format!("An account for {} was created by another payment", email)
            }
            StorefrontError::ProvisioningFailed { account_id, reason } => {
                format!("Directory provisioning failed for account {}: {}", account_id, reason)
            }
            StorefrontError::AccountNotFound(email) => format!("User not found: {}", email),
            StorefrontError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            StorefrontError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for StorefrontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for StorefrontError {}

impl From<DomainError> for StorefrontError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => StorefrontError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => StorefrontError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for StorefrontError {
    fn from(err: ValidationError) -> Self {
        StorefrontError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
