//! Adapters - Implementations of ports for external systems.
//!
//! - `postgres` - PostgreSQL store adapters
//! - `memory` - In-memory store for tests and local runs
//! - `razorpay` - Payment gateway
//! - `google` - Workspace directory provisioning
//! - `http` - REST API

pub mod google;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod razorpay;
