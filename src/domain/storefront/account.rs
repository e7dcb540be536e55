//! Account aggregate.
//!
//! An account exists only for a payment that reached `Completed`. It keeps
//! the canonical email as username and an Argon2id hash of the generated
//! password, never the password itself.

use serde::Serialize;

use crate::domain::foundation::{AccountId, Timestamp};

use super::{CanonicalEmail, PaymentStatus, PendingPayment, PlanId, StorefrontError};

/// Free maintenance included with every lifetime plan.
pub const MAINTENANCE_PERIOD_YEARS: i64 = 3;

/// A provisioned storage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub email: CanonicalEmail,
    pub first_name: String,
    pub last_name: String,
    pub plan_id: PlanId,
    pub purchased_at: Timestamp,
    pub next_maintenance_at: Timestamp,
    /// Login name; always the canonical email.
    pub username: CanonicalEmail,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Snapshot of the originating payment's status.
    pub payment_status: PaymentStatus,
    /// Set once the external directory confirmed the account.
    pub provisioned_at: Option<Timestamp>,
}

impl Account {
    /// Builds the account for a payment that has just been completed.
    ///
    /// # Errors
    ///
    /// `InvalidPaymentState` unless `payment` is in `Completed` state; an
    /// account is never created for a pending or failed payment.
    pub fn for_completed_payment(
        payment: &PendingPayment,
        password_hash: String,
        purchased_at: Timestamp,
    ) -> Result<Self, StorefrontError> {
        if payment.status != PaymentStatus::Completed {
            return Err(StorefrontError::invalid_payment_state(
                payment.gateway_order_id.clone(),
                payment.status,
            ));
        }

        Ok(Self {
            id: AccountId::new(),
            email: payment.email.clone(),
            first_name: payment.first_name.clone(),
            last_name: payment.last_name.clone(),
            plan_id: payment.plan_id.clone(),
            purchased_at,
            next_maintenance_at: purchased_at.add_years(MAINTENANCE_PERIOD_YEARS),
            username: payment.email.clone(),
            password_hash,
            payment_status: payment.status,
            provisioned_at: None,
        })
    }

    pub fn is_provisioned(&self) -> bool {
        self.provisioned_at.is_some()
    }

    pub fn mark_provisioned(&mut self, at: Timestamp) {
        self.provisioned_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::OrderId;
    use crate::domain::storefront::{CustomerDetails, PlanCatalog};
    use chrono::Duration;

    fn payment() -> PendingPayment {
        let plan = PlanCatalog::standard().find("2TB").unwrap();
        PendingPayment::open(
            OrderId::generate(),
            plan,
            CustomerDetails {
                first_name: "Bob".to_string(),
                last_name: "Builder".to_string(),
                email: CanonicalEmail::from_raw("bob@yahoo.com").unwrap(),
            },
            "order_B",
        )
    }

    #[test]
    fn built_from_completed_payment() {
        let mut payment = payment();
        payment.complete("pay_B", "sig_B").unwrap();
        let now = Timestamp::now();

        let account = Account::for_completed_payment(&payment, "$argon2id$x".into(), now).unwrap();

        assert_eq!(account.email.as_str(), "bob@wecloudstorage.in");
        assert_eq!(account.username, account.email);
        assert_eq!(account.first_name, "Bob");
        assert_eq!(account.plan_id.as_str(), "2TB");
        assert_eq!(account.payment_status, PaymentStatus::Completed);
        assert_eq!(
            account.next_maintenance_at.duration_since(&account.purchased_at),
            Duration::days(3 * 365)
        );
        assert!(!account.is_provisioned());
    }

    #[test]
    fn pending_payment_cannot_produce_account() {
        let result = Account::for_completed_payment(&payment(), "h".into(), Timestamp::now());
        assert!(matches!(
            result,
            Err(StorefrontError::InvalidPaymentState { status: PaymentStatus::Pending, .. })
        ));
    }

    #[test]
    fn failed_payment_cannot_produce_account() {
        let mut payment = payment();
        payment.fail().unwrap();
        assert!(Account::for_completed_payment(&payment, "h".into(), Timestamp::now()).is_err());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let mut payment = payment();
        payment.complete("pay_B", "sig_B").unwrap();
        let account =
            Account::for_completed_payment(&payment, "$argon2id$secret".into(), Timestamp::now())
                .unwrap();
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn mark_provisioned_sets_timestamp() {
        let mut payment = payment();
        payment.complete("pay_B", "sig_B").unwrap();
        let mut account =
            Account::for_completed_payment(&payment, "h".into(), Timestamp::now()).unwrap();
        let at = Timestamp::now();
        account.mark_provisioned(at);
        assert_eq!(account.provisioned_at, Some(at));
    }
}
