//! In-memory storefront store.
//!
//! Implements all three store ports over one pair of maps. Useful for
//! tests and local runs without PostgreSQL.
//!
//! `complete_payment` applies its two writes in order and rolls back the
//! first when the second cannot land, matching the transactional adapter.
//! A fault switch aborts between the two writes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp};
use crate::domain::storefront::{Account, CanonicalEmail, PaymentStatus, PendingPayment};
use crate::ports::{AccountRepository, PaymentCompletionWriter, PaymentRepository};

/// In-memory storage for payments and accounts.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefrontStore {
    /// Keyed by gateway order id.
    payments: Arc<RwLock<HashMap<String, PendingPayment>>>,
    /// Keyed by canonical email, which enforces uniqueness.
    accounts: Arc<RwLock<HashMap<CanonicalEmail, Account>>>,
    abort_between_writes: Arc<AtomicBool>,
}

impl InMemoryStorefrontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `complete_payment` abort after its first write.
    pub fn set_abort_between_writes(&self, abort: bool) {
        self.abort_between_writes.store(abort, Ordering::SeqCst);
    }

    /// Get a stored payment by gateway order id
    pub async fn payment(&self, gateway_order_id: &str) -> Option<PendingPayment> {
        self.payments.read().await.get(gateway_order_id).cloned()
    }

    pub async fn payment_count(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStorefrontStore {
    async fn save(&self, payment: &PendingPayment) -> Result<(), DomainError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.gateway_order_id) {
            return Err(DomainError::database(format!(
                "Payment for order {} already recorded",
                payment.gateway_order_id
            )));
        }
        payments.insert(payment.gateway_order_id.clone(), payment.clone());
        Ok(())
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PendingPayment>, DomainError> {
        Ok(self.payment(gateway_order_id).await)
    }

    async fn mark_failed(&self, gateway_order_id: &str) -> Result<bool, DomainError> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(gateway_order_id) {
            Some(payment) if payment.is_pending() => {
                payment.status = PaymentStatus::Failed;
                payment.updated_at = Timestamp::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryStorefrontStore {
    async fn exists_by_email(&self, email: &CanonicalEmail) -> Result<bool, DomainError> {
        Ok(self.accounts.read().await.contains_key(email))
    }

    async fn find_by_email(&self, email: &CanonicalEmail) -> Result<Option<Account>, DomainError> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn mark_provisioned(&self, id: &AccountId, at: Timestamp) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .values_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::AccountNotFound, "Account not found"))?;
        account.mark_provisioned(at);
        Ok(())
    }

    async fn list_unprovisioned(&self, limit: u32) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        let mut pending: Vec<Account> = accounts
            .values()
            .filter(|a| !a.is_provisioned())
            .cloned()
            .collect();
        pending.sort_by_key(|a| a.purchased_at);
        pending.truncate(limit as usize);
        Ok(pending)
    }
}

#[async_trait]
impl PaymentCompletionWriter for InMemoryStorefrontStore {
    async fn complete_payment(
        &self,
        payment: &PendingPayment,
        account: &Account,
    ) -> Result<(), DomainError> {
        // Lock order: payments, then accounts
        let mut payments = self.payments.write().await;
        let mut accounts = self.accounts.write().await;

        let key = payment.gateway_order_id.as_str();
        let previous = match payments.get(key) {
            Some(stored) if stored.is_pending() => stored.clone(),
            Some(_) => {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    "Payment is no longer pending",
                ))
            }
            None => {
                return Err(DomainError::new(ErrorCode::PaymentNotFound, "Payment not found"))
            }
        };

        // Write 1: complete the payment
        payments.insert(key.to_string(), payment.clone());

        if self.abort_between_writes.load(Ordering::SeqCst) {
            payments.insert(key.to_string(), previous);
            return Err(DomainError::database("Transaction aborted between writes"));
        }

        // Write 2: insert the account
        if accounts.contains_key(&account.email) {
            payments.insert(key.to_string(), previous);
            return Err(DomainError::new(ErrorCode::AccountExists, "Email already registered")
                .with_detail("email", account.email.as_str()));
        }
        accounts.insert(account.email.clone(), account.clone());

        Ok(())
    }
}
