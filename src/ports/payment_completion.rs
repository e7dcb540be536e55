//! Payment completion port.
//!
//! Completing a payment and creating its account happen in one
//! transaction spanning both stores. Either both writes land or neither
//! does, and an aborted attempt can be retried.

use crate::domain::foundation::DomainError;
use crate::domain::storefront::{Account, PendingPayment};
use async_trait::async_trait;

#[async_trait]
pub trait PaymentCompletionWriter: Send + Sync {
    /// Mark `payment` completed and insert `account` atomically.
    ///
    /// `payment` carries the gateway payment id and signature to record.
    ///
    /// # Errors
    ///
    /// - `AccountExists` if another account already holds the email
    /// - `InvalidStateTransition` if the stored payment is no longer pending
    /// - `DatabaseError` on persistence failure
    ///
    /// Every error leaves both stores unchanged.
    async fn complete_payment(
        &self,
        payment: &PendingPayment,
        account: &Account,
    ) -> Result<(), DomainError>;
}
