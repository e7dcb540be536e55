//! Account repository port.
//!
//! Accounts are only ever created through [`PaymentCompletionWriter`];
//! this port covers the reads and the provisioning marker.
//!
//! [`PaymentCompletionWriter`]: super::PaymentCompletionWriter

use crate::domain::foundation::{AccountId, DomainError, Timestamp};
use crate::domain::storefront::{Account, CanonicalEmail};
use async_trait::async_trait;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Check whether an account exists for the canonical email.
    ///
    /// Implementations should avoid loading the full record.
    async fn exists_by_email(&self, email: &CanonicalEmail) -> Result<bool, DomainError>;

    /// Find an account by canonical email.
    async fn find_by_email(&self, email: &CanonicalEmail) -> Result<Option<Account>, DomainError>;

    /// Record that the external directory confirmed the account.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this id
    /// - `DatabaseError` on persistence failure
    async fn mark_provisioned(&self, id: &AccountId, at: Timestamp) -> Result<(), DomainError>;

    /// Accounts whose directory provisioning was never confirmed, oldest first.
    async fn list_unprovisioned(&self, limit: u32) -> Result<Vec<Account>, DomainError>;
}
