//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! - `PostgresPaymentRepository` - Purchase attempts
//! - `PostgresAccountRepository` - Account reads and provisioning marker
//! - `PostgresPurchaseLedger` - Transactional payment completion
//!
//! Schema lives in `migrations/`; `accounts_email_key` is the
//! authoritative duplicate-email signal.

mod account_repository;
mod payment_repository;
mod purchase_ledger;

pub use account_repository::PostgresAccountRepository;
pub use payment_repository::PostgresPaymentRepository;
pub use purchase_ledger::PostgresPurchaseLedger;
