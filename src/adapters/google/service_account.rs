//! Google service account key.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Error)]
pub enum ServiceAccountKeyError {
    #[error("failed to read service account key: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid service account key JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("service account key has an empty {0}")]
    EmptyField(&'static str),
}

/// Service account credentials as downloaded from the Cloud console.
///
/// Only the fields used for the JWT bearer flow are read.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, ServiceAccountKeyError> {
        let key: ServiceAccountKey = serde_json::from_str(json)?;
        if key.client_email.trim().is_empty() {
            return Err(ServiceAccountKeyError::EmptyField("client_email"));
        }
        if key.private_key.expose_secret().trim().is_empty() {
            return Err(ServiceAccountKeyError::EmptyField("private_key"));
        }
        Ok(key)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceAccountKeyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub(crate) fn private_key_pem(&self) -> &str {
        self.private_key.expose_secret()
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
