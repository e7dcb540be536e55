//! HTTP handlers for storefront endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::storefront::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, InitiatePurchaseCommand,
    InitiatePurchaseHandler, ListPlansHandler, ListPlansQuery, LookupCredentialsHandler,
    LookupCredentialsQuery,
};
use crate::domain::storefront::{
    PasswordHasher, PaymentSignatureVerifier, PlanCatalog, StorefrontError,
};
use crate::ports::{
    AccountRepository, DirectoryProvisioner, PaymentCompletionWriter, PaymentGateway,
    PaymentRepository,
};

use super::dto::{
    AccountResponse, ConfirmPaymentRequest, ConfirmPaymentResponse, ErrorResponse,
    HealthResponse, InitiatePurchaseRequest, InitiatePurchaseResponse, PlanResponse,
    PlansResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is behind an `Arc` or cheap to clone.
#[derive(Clone)]
pub struct StorefrontAppState {
    pub catalog: Arc<PlanCatalog>,
    pub payment_repository: Arc<dyn PaymentRepository>,
    pub account_repository: Arc<dyn AccountRepository>,
    pub completion_writer: Arc<dyn PaymentCompletionWriter>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub directory: Arc<dyn DirectoryProvisioner>,
    pub signature_verifier: PaymentSignatureVerifier,
    pub password_hasher: PasswordHasher,
    /// Public gateway key id handed to the checkout widget.
    pub gateway_key_id: String,
}

impl StorefrontAppState {
    pub fn list_plans_handler(&self) -> ListPlansHandler {
        ListPlansHandler::new(self.catalog.clone())
    }

    pub fn initiate_purchase_handler(&self) -> InitiatePurchaseHandler {
        InitiatePurchaseHandler::new(
            self.catalog.clone(),
            self.account_repository.clone(),
            self.payment_repository.clone(),
            self.payment_gateway.clone(),
            self.gateway_key_id.clone(),
        )
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(
            self.signature_verifier.clone(),
            self.password_hasher.clone(),
            self.payment_repository.clone(),
            self.account_repository.clone(),
            self.completion_writer.clone(),
            self.directory.clone(),
        )
    }

    pub fn lookup_credentials_handler(&self) -> LookupCredentialsHandler {
        LookupCredentialsHandler::new(self.account_repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/plans - List the plan catalog
pub async fn list_plans(State(state): State<StorefrontAppState>) -> impl IntoResponse {
    let plans = state.list_plans_handler().handle(ListPlansQuery);
    Json(PlansResponse {
        plans: plans.into_iter().map(PlanResponse::from).collect(),
    })
}

/// GET /api/accounts/:email - Look up an account by email
pub async fn lookup_account(
    State(state): State<StorefrontAppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, StorefrontApiError> {
    let result = state
        .lookup_credentials_handler()
        .handle(LookupCredentialsQuery { email })
        .await?;

    Ok(Json(AccountResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/purchases - Start a purchase
pub async fn initiate_purchase(
    State(state): State<StorefrontAppState>,
    Json(request): Json<InitiatePurchaseRequest>,
) -> Result<impl IntoResponse, StorefrontApiError> {
    let cmd = InitiatePurchaseCommand {
        plan_id: request.plan_id,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
    };

    let result = state.initiate_purchase_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(InitiatePurchaseResponse::from(result)),
    ))
}

/// POST /api/purchases/verify - Gateway completion callback
pub async fn confirm_payment(
    State(state): State<StorefrontAppState>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, StorefrontApiError> {
    let cmd = ConfirmPaymentCommand {
        gateway_order_id: request.razorpay_order_id,
        gateway_payment_id: request.razorpay_payment_id,
        signature: request.razorpay_signature,
    };

    let result = state.confirm_payment_handler().handle(cmd).await?;

    // The body carries the only copy of the password.
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(ConfirmPaymentResponse::from(result)),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub enum StorefrontApiError {
    BadRequest(String, String),
    NotFound(String, String),
    Conflict(String, String),
    BadGateway(String, String),
    Internal(String),
}

impl From<StorefrontError> for StorefrontApiError {
    fn from(err: StorefrontError) -> Self {
        let code = err.code().to_string();
        let message = err.message();
        match err {
            StorefrontError::UnknownPlan(_)
            | StorefrontError::ValidationFailed { .. }
            | StorefrontError::SignatureMismatch { .. } => {
                StorefrontApiError::BadRequest(code, message)
            }
            StorefrontError::PaymentNotFound(_) | StorefrontError::AccountNotFound(_) => {
                StorefrontApiError::NotFound(code, message)
            }
            StorefrontError::DuplicateAccount(_) | StorefrontError::InvalidPaymentState { .. } => {
                StorefrontApiError::Conflict(code, message)
            }
            StorefrontError::AccountConflict(_) => {
                StorefrontApiError::Conflict("ACCOUNT_CONFLICT".to_string(), message)
            }
            StorefrontError::OrderCreationFailed { .. }
            | StorefrontError::ProvisioningFailed { .. } => {
                StorefrontApiError::BadGateway(code, message)
            }
            StorefrontError::Infrastructure(_) => StorefrontApiError::Internal(message),
        }
    }
}

impl IntoResponse for StorefrontApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            StorefrontApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, msg))
            }
            StorefrontApiError::NotFound(code, msg) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new(code, msg))
            }
            StorefrontApiError::Conflict(code, msg) => {
                (StatusCode::CONFLICT, ErrorResponse::new(code, msg))
            }
            StorefrontApiError::BadGateway(code, msg) => {
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(code, msg))
            }
            StorefrontApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AccountId;
    use crate::domain::storefront::{CanonicalEmail, PaymentStatus};

    fn status_of(err: StorefrontError) -> StatusCode {
        StorefrontApiError::from(err).into_response().status()
    }

    fn email() -> CanonicalEmail {
        CanonicalEmail::from_raw("alice@gmail.com").unwrap()
    }

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(status_of(StorefrontError::duplicate_account(email())), StatusCode::CONFLICT);
        assert_eq!(status_of(StorefrontError::account_conflict(email())), StatusCode::CONFLICT);
        assert_eq!(
            status_of(StorefrontError::invalid_payment_state("order_X", PaymentStatus::Completed)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(status_of(StorefrontError::unknown_plan("9TB")), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(StorefrontError::signature_mismatch("order_X")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(StorefrontError::validation("email", "missing")),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_records_map_to_404() {
        assert_eq!(status_of(StorefrontError::payment_not_found("order_X")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(StorefrontError::account_not_found("a@wecloudstorage.in")),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn upstream_failures_map_to_502() {
        assert_eq!(
            status_of(StorefrontError::order_creation_failed("timeout")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(StorefrontError::provisioning_failed(AccountId::new(), "quota")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn infrastructure_maps_to_500_without_detail() {
        let err = StorefrontApiError::from(StorefrontError::infrastructure("pool timed out"));
        assert!(matches!(err, StorefrontApiError::Internal(ref m) if m.contains("pool timed out")));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn account_conflict_has_distinct_code() {
        let err = StorefrontApiError::from(StorefrontError::account_conflict(email()));
        assert!(matches!(err, StorefrontApiError::Conflict(ref code, _) if code == "ACCOUNT_CONFLICT"));
    }
}
