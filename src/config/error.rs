//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Razorpay key id format")]
    InvalidRazorpayKeyId,

    #[error("Live Razorpay keys are only allowed in production")]
    LiveKeyOutsideProduction,

    #[error("Only one of service_account_key_path and service_account_key_json may be set")]
    AmbiguousServiceAccountKey,

    #[error("Invalid delegated admin email")]
    InvalidDelegatedAdmin,

    #[error("Organizational unit root must start with '/'")]
    InvalidOrgUnitRoot,

    #[error("API base URL must use HTTPS in production: {0}")]
    InsecureApiBaseUrl(&'static str),
}
