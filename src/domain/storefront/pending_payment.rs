//! PendingPayment aggregate.
//!
//! Tracks one purchase attempt from gateway order creation to its single
//! terminal transition.

use serde::Serialize;

use crate::domain::foundation::{OrderId, StateMachine, Timestamp};

use super::{CanonicalEmail, PaymentStatus, Plan, PlanId, StorefrontError, PLAN_CURRENCY};

/// Customer fields submitted with a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: CanonicalEmail,
}

/// A purchase attempt and its payment state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingPayment {
    /// Internal receipt id sent to the gateway.
    pub order_id: OrderId,
    pub plan_id: PlanId,
    /// Plan price in whole currency units.
    pub amount: i64,
    pub currency: String,
    pub first_name: String,
    pub last_name: String,
    pub email: CanonicalEmail,
    /// Order id returned by the gateway; the callback refers to this one.
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub status: PaymentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PendingPayment {
    /// Opens a pending payment for an order the gateway has just created.
    pub fn open(
        order_id: OrderId,
        plan: &Plan,
        customer: CustomerDetails,
        gateway_order_id: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            order_id,
            plan_id: plan.id.clone(),
            amount: plan.price,
            currency: PLAN_CURRENCY.to_string(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: None,
            gateway_signature: None,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Records a verified payment.
    ///
    /// # Errors
    ///
    /// `InvalidPaymentState` if the payment already reached a terminal state.
    pub fn complete(
        &mut self,
        gateway_payment_id: impl Into<String>,
        gateway_signature: impl Into<String>,
    ) -> Result<(), StorefrontError> {
        self.transition(PaymentStatus::Completed)?;
        self.gateway_payment_id = Some(gateway_payment_id.into());
        self.gateway_signature = Some(gateway_signature.into());
        Ok(())
    }

    /// Records a failed verification.
    ///
    /// # Errors
    ///
    /// `InvalidPaymentState` if the payment already reached a terminal state.
    pub fn fail(&mut self) -> Result<(), StorefrontError> {
        self.transition(PaymentStatus::Failed)
    }

    fn transition(&mut self, target: PaymentStatus) -> Result<(), StorefrontError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            StorefrontError::invalid_payment_state(self.gateway_order_id.clone(), self.status)
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
