//! Payment repository port.
//!
//! Persists [`PendingPayment`] records, one per purchase attempt. The
//! gateway order id is the lookup key used by the verification callback.

use crate::domain::foundation::DomainError;
use crate::domain::storefront::PendingPayment;
use async_trait::async_trait;

/// Repository port for purchase attempts.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new pending payment.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, payment: &PendingPayment) -> Result<(), DomainError>;

    /// Find a payment by the gateway's order id.
    ///
    /// Returns `None` if no attempt references this order.
    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PendingPayment>, DomainError>;

    /// Move a pending payment to `failed`.
    ///
    /// Only applies while the stored status is still `pending`. Returns
    /// `true` when this call performed the transition.
    async fn mark_failed(&self, gateway_order_id: &str) -> Result<bool, DomainError>;
}
