//! HTTP adapter for storefront endpoints.
//!
//! Exposes the purchase workflow via REST API:
//! - `GET /api/plans` - Plan catalog
//! - `POST /api/purchases` - Start a purchase
//! - `POST /api/purchases/verify` - Confirm a payment
//! - `GET /api/accounts/:email` - Look up an account
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;

pub use handlers::{StorefrontApiError, StorefrontAppState};
pub use routes::{storefront_router, storefront_routes};
