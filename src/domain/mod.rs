//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `storefront` - Plans, purchase attempts, accounts and credentials

pub mod foundation;
pub mod storefront;
