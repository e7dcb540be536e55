//! Storefront handlers.
//!
//! ## Commands
//! - Initiating a plan purchase
//! - Confirming a payment from the gateway callback
//!
//! ## Queries
//! - Listing plans
//! - Looking up an account by email

mod confirm_payment;
mod initiate_purchase;
mod list_plans;
mod lookup_credentials;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use confirm_payment::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult, ProvisioningOutcome,
};
pub use initiate_purchase::{
    InitiatePurchaseCommand, InitiatePurchaseHandler, InitiatePurchaseResult,
};

// Queries
pub use list_plans::{ListPlansHandler, ListPlansQuery, ListPlansResult};
pub use lookup_credentials::{
    LookupCredentialsHandler, LookupCredentialsQuery, LookupCredentialsResult,
};
