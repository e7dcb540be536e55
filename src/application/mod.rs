//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (purchase, confirmation) are separate from query
//! handlers (plans, account lookup).

pub mod handlers;

pub use handlers::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentResult, InitiatePurchaseCommand,
    InitiatePurchaseHandler, InitiatePurchaseResult, ListPlansHandler, ListPlansQuery,
    ListPlansResult, LookupCredentialsHandler, LookupCredentialsQuery, LookupCredentialsResult,
    ProvisioningOutcome,
};
