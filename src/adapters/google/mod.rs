//! Google Workspace directory adapter.
//!
//! Implements the `DirectoryProvisioner` port with the Admin SDK
//! Directory API, authenticated as a service account with domain-wide
//! delegation.
//!
//! # Configuration
//!
//! - `WECLOUD__DIRECTORY__SERVICE_ACCOUNT_KEY_PATH` or
//!   `WECLOUD__DIRECTORY__SERVICE_ACCOUNT_KEY_JSON`
//! - `WECLOUD__DIRECTORY__DELEGATED_ADMIN_EMAIL`
//! - `WECLOUD__DIRECTORY__ORG_UNIT_ROOT` (default `/public`)

mod directory_provisioner;
mod mock_directory;
mod service_account;
mod token_source;

pub use directory_provisioner::{GoogleDirectoryConfig, GoogleDirectoryProvisioner};
pub use mock_directory::MockDirectoryProvisioner;
pub use service_account::{ServiceAccountKey, ServiceAccountKeyError};
pub use token_source::{AccessTokenSource, DIRECTORY_USER_SCOPE};
