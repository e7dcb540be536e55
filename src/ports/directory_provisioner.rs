//! Directory provisioner port.
//!
//! Creates the customer's login identity in the external user directory.
//! The call is not transactional with our stores: a failure after the
//! account is committed leaves the account unprovisioned.

use async_trait::async_trait;

use crate::domain::storefront::{CanonicalEmail, GeneratedPassword, PlanId};

#[async_trait]
pub trait DirectoryProvisioner: Send + Sync {
    /// Create a directory user for a newly purchased account.
    async fn create_account(&self, request: ProvisionAccountRequest) -> Result<(), DirectoryError>;
}

/// Everything the directory needs to create a user.
#[derive(Debug, Clone)]
pub struct ProvisionAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: CanonicalEmail,
    pub password: GeneratedPassword,
    /// Plan id; selects the organizational unit.
    pub plan_tier: PlanId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryErrorCode {
    /// Could not obtain an access token.
    Authentication,
    /// The directory already has a user with this address.
    AlreadyExists,
    /// Network or connection failure.
    Network,
    /// Any other rejection from the directory.
    Provider,
}

/// Error returned by a directory provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryError {
    pub code: DirectoryErrorCode,
    pub message: String,
}

impl DirectoryError {
    pub fn new(code: DirectoryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorCode::Authentication, message)
    }

    pub fn already_exists(email: &CanonicalEmail) -> Self {
        Self::new(
            DirectoryErrorCode::AlreadyExists,
            format!("{} already exists in the directory", email),
        )
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorCode::Network, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorCode::Provider, message)
    }
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for DirectoryError {}
