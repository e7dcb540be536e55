//! Storefront domain module.
//!
//! The purchase-to-provisioning vocabulary: canonical emails, the plan
//! catalog, purchase attempts and the accounts they produce.
//!
//! # Module Structure
//!
//! - `email` - Canonical organizational email normalization
//! - `plan` - Hard-coded plan catalog
//! - `payment_status` - PaymentStatus state machine
//! - `pending_payment` - PendingPayment aggregate
//! - `account` - Account aggregate
//! - `credentials` - Generated passwords and Argon2id hashing
//! - `signature` - Gateway callback signature verification
//! - `errors` - StorefrontError taxonomy

mod account;
mod credentials;
mod email;
mod errors;
mod payment_status;
mod pending_payment;
mod plan;
mod signature;

pub use account::{Account, MAINTENANCE_PERIOD_YEARS};
pub use credentials::{GeneratedPassword, HashingCost, IssuedCredentials, PasswordHasher};
pub use email::{normalize_email, CanonicalEmail, ORGANIZATION_DOMAIN};
pub use errors::StorefrontError;
pub use payment_status::PaymentStatus;
pub use pending_payment::{CustomerDetails, PendingPayment};
pub use plan::{Plan, PlanCatalog, PlanId, PLAN_CURRENCY};
pub use signature::PaymentSignatureVerifier;
