//! LookupCredentialsHandler - Query handler for account details by email.
//!
//! Returns the login username and account state. Passwords are disclosed
//! once at confirmation and are not recoverable here; customers who lose
//! theirs reset it through the directory.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::storefront::{CanonicalEmail, PaymentStatus, PlanId, StorefrontError};
use crate::ports::AccountRepository;

/// Query by any email whose local part matches the account.
#[derive(Debug, Clone)]
pub struct LookupCredentialsQuery {
    pub email: String,
}

/// Account details safe to show the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCredentialsResult {
    pub username: CanonicalEmail,
    pub plan_id: PlanId,
    pub purchased_at: Timestamp,
    pub next_maintenance_at: Timestamp,
    pub payment_status: PaymentStatus,
    pub provisioned: bool,
}

pub struct LookupCredentialsHandler {
    accounts: Arc<dyn AccountRepository>,
}

impl LookupCredentialsHandler {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    pub async fn handle(
        &self,
        query: LookupCredentialsQuery,
    ) -> Result<LookupCredentialsResult, StorefrontError> {
        let email = CanonicalEmail::from_raw(&query.email)?;
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or_else(|| StorefrontError::account_not_found(email.as_str()))?;

        Ok(LookupCredentialsResult {
            provisioned: account.is_provisioned(),
            username: account.username,
            plan_id: account.plan_id,
            purchased_at: account.purchased_at,
            next_maintenance_at: account.next_maintenance_at,
            payment_status: account.payment_status,
        })
    }
}
