//! InitiatePurchaseHandler - Command handler for starting a plan purchase.
//!
//! Resolves the plan, derives the canonical email, refuses emails that
//! already own an account, creates a gateway order and records a pending
//! payment. No account and no password exist until the payment is verified.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::OrderId;
use crate::domain::storefront::{
    CanonicalEmail, CustomerDetails, IssuedCredentials, PendingPayment, PlanCatalog,
    StorefrontError, PLAN_CURRENCY,
};
use crate::ports::{AccountRepository, CreateOrderRequest, PaymentGateway, PaymentRepository};

/// Command to start purchasing a plan.
#[derive(Debug, Clone)]
pub struct InitiatePurchaseCommand {
    pub plan_id: String,
    /// Customer's contact email; only its local part is kept.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Everything the checkout widget needs to collect payment.
#[derive(Debug, Clone)]
pub struct InitiatePurchaseResult {
    pub order_id: OrderId,
    pub gateway_order_id: String,
    pub amount_minor_units: i64,
    pub currency: String,
    /// Public gateway key id for the widget.
    pub key_id: String,
    pub payment: PendingPayment,
    /// Always `None`: credentials are issued on verification.
    pub credentials: Option<IssuedCredentials>,
}

/// Handler for purchase initiation.
pub struct InitiatePurchaseHandler {
    catalog: Arc<PlanCatalog>,
    accounts: Arc<dyn AccountRepository>,
    payments: Arc<dyn PaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    key_id: String,
}

impl InitiatePurchaseHandler {
    pub fn new(
        catalog: Arc<PlanCatalog>,
        accounts: Arc<dyn AccountRepository>,
        payments: Arc<dyn PaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        key_id: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            accounts,
            payments,
            gateway,
            key_id: key_id.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: InitiatePurchaseCommand,
    ) -> Result<InitiatePurchaseResult, StorefrontError> {
        // 1. Validate input
        let first_name = required("first_name", &cmd.first_name)?;
        let last_name = required("last_name", &cmd.last_name)?;
        let plan = self
            .catalog
            .find(cmd.plan_id.trim())
            .ok_or_else(|| StorefrontError::unknown_plan(&cmd.plan_id))?;
        let email = CanonicalEmail::from_raw(&cmd.email)?;

        // 2. Refuse emails that already own an account
        if self.accounts.exists_by_email(&email).await? {
            return Err(StorefrontError::duplicate_account(email));
        }

        // 3. Create the gateway order
        let amount_minor_units = plan
            .amount_minor_units()
            .ok_or_else(|| StorefrontError::validation("price", "amount overflows minor units"))?;
        let order_id = OrderId::generate();
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount_minor_units,
                currency: PLAN_CURRENCY.to_string(),
                receipt: order_id.to_string(),
            })
            .await
            .map_err(|e| {
                warn!(order_id = %order_id, error = %e, "Gateway order creation failed");
                StorefrontError::order_creation_failed("payment gateway unavailable")
            })?;

        // 4. Record the pending payment
        let payment = PendingPayment::open(
            order_id.clone(),
            plan,
            CustomerDetails {
                first_name,
                last_name,
                email,
            },
            order.id.clone(),
        );
        self.payments.save(&payment).await?;

        info!(
            order_id = %order_id,
            gateway_order_id = %order.id,
            plan_id = %plan.id,
            email = %payment.email,
            "Purchase initiated"
        );

        Ok(InitiatePurchaseResult {
            order_id,
            gateway_order_id: order.id,
            amount_minor_units,
            currency: payment.currency.clone(),
            key_id: self.key_id.clone(),
            payment,
            credentials: None,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, StorefrontError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorefrontError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
