//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `PaymentRepository` - Purchase attempts keyed by gateway order id
//! - `AccountRepository` - Account reads and provisioning marker
//! - `PaymentCompletionWriter` - Atomic payment completion plus account insert
//!
//! ## External Service Ports
//!
//! - `PaymentGateway` - Order creation with the payment gateway
//! - `DirectoryProvisioner` - User creation in the external directory

mod account_repository;
mod directory_provisioner;
mod payment_completion;
mod payment_gateway;
mod payment_repository;

pub use account_repository::AccountRepository;
pub use directory_provisioner::{
    DirectoryError, DirectoryErrorCode, DirectoryProvisioner, ProvisionAccountRequest,
};
pub use payment_completion::PaymentCompletionWriter;
pub use payment_gateway::{
    CreateOrderRequest, GatewayOrder, PaymentGateway, PaymentGatewayError, PaymentGatewayErrorCode,
};
pub use payment_repository::PaymentRepository;
