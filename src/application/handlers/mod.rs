//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod storefront;

pub use storefront::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult, InitiatePurchaseCommand,
    InitiatePurchaseHandler, InitiatePurchaseResult, ListPlansHandler, ListPlansQuery,
    ListPlansResult, LookupCredentialsHandler, LookupCredentialsQuery, LookupCredentialsResult,
    ProvisioningOutcome,
};
