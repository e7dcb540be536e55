//! HTTP adapters - REST API implementations.

pub mod storefront;

pub use storefront::storefront_router;
pub use storefront::StorefrontAppState;
