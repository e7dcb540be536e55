//! In-memory adapters for tests and local development.

mod storefront_store;

pub use storefront_store::InMemoryStorefrontStore;
