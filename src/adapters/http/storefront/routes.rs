//! Axum router configuration for storefront endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    confirm_payment, health, initiate_purchase, list_plans, lookup_account, StorefrontAppState,
};

/// Create the storefront API router.
///
/// # Routes
/// - `GET /plans` - Plan catalog
/// - `POST /purchases` - Start a purchase
/// - `POST /purchases/verify` - Gateway completion callback
/// - `GET /accounts/:email` - Account lookup
pub fn storefront_routes() -> Router<StorefrontAppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/purchases", post(initiate_purchase))
        .route("/purchases/verify", post(confirm_payment))
        .route("/accounts/:email", get(lookup_account))
}

/// Create the complete storefront router.
///
/// Mounts the API under `/api` and adds `GET /health`.
///
/// # Example
///
/// ```ignore
/// let app = storefront_router().with_state(app_state);
/// ```
pub fn storefront_router() -> Router<StorefrontAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", storefront_routes())
}
