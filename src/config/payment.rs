//! Payment gateway configuration (Razorpay)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Public key id, also handed to the checkout widget
    pub razorpay_key_id: String,

    /// API secret; signs checkout callbacks as well as authenticating API calls
    pub razorpay_key_secret: SecretString,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_test_")
    }

    pub fn is_live_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_live_")
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.razorpay_key_id.is_empty() {
            return Err(ValidationError::MissingRequired(
                "WECLOUD__PAYMENT__RAZORPAY_KEY_ID",
            ));
        }
        if self.razorpay_key_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "WECLOUD__PAYMENT__RAZORPAY_KEY_SECRET",
            ));
        }
        if !self.is_test_mode() && !self.is_live_mode() {
            return Err(ValidationError::InvalidRazorpayKeyId);
        }
        if self.is_live_mode() && environment != Environment::Production {
            return Err(ValidationError::LiveKeyOutsideProduction);
        }
        if environment == Environment::Production && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InsecureApiBaseUrl("payment.api_base_url"));
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}
