//! Application configuration.
//!
//! Loaded from environment variables with the `WECLOUD` prefix, using `__` to
//! separate nested keys. A `.env` file is read first when present.
//!
//! ```no_run
//! use wecloud_storefront::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod directory;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use directory::{DirectoryConfig, ServiceAccountKeySource};
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root configuration for the storefront service.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub payment: PaymentConfig,

    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Reads configuration from the environment.
    ///
    /// - `WECLOUD__SERVER__PORT=8080` -> `server.port`
    /// - `WECLOUD__PAYMENT__RAZORPAY_KEY_ID=rzp_test_...` -> `payment.razorpay_key_id`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` when a required section is missing or a
    /// value cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WECLOUD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic checks across every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let environment = self.server.environment;
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate(environment)?;
        self.directory.validate(environment)?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
