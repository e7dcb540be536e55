//! Directory provisioning configuration (Google Workspace Admin SDK)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Where the service account key comes from.
#[derive(Debug)]
pub enum ServiceAccountKeySource<'a> {
    Path(&'a str),
    Json(&'a str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Path to the downloaded service account JSON key
    pub service_account_key_path: Option<String>,

    /// Inline service account JSON key, for environments without a filesystem secret
    pub service_account_key_json: Option<SecretString>,

    /// Workspace admin the service account impersonates
    pub delegated_admin_email: String,

    /// Parent of the per-plan organizational units
    #[serde(default = "default_org_unit_root")]
    pub org_unit_root: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl DirectoryConfig {
    /// The configured key source, once [`validate`](Self::validate) has passed.
    pub fn key_source(&self) -> Result<ServiceAccountKeySource<'_>, ValidationError> {
        match (&self.service_account_key_path, &self.service_account_key_json) {
            (Some(_), Some(_)) => Err(ValidationError::AmbiguousServiceAccountKey),
            (Some(path), None) if !path.trim().is_empty() => {
                Ok(ServiceAccountKeySource::Path(path))
            }
            (None, Some(json)) if !json.expose_secret().trim().is_empty() => {
                Ok(ServiceAccountKeySource::Json(json.expose_secret()))
            }
            _ => Err(ValidationError::MissingRequired(
                "WECLOUD__DIRECTORY__SERVICE_ACCOUNT_KEY_PATH",
            )),
        }
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        self.key_source()?;

        let admin = self.delegated_admin_email.trim();
        if admin.is_empty() {
            return Err(ValidationError::MissingRequired(
                "WECLOUD__DIRECTORY__DELEGATED_ADMIN_EMAIL",
            ));
        }
        match admin.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(ValidationError::InvalidDelegatedAdmin),
        }

        if !self.org_unit_root.starts_with('/') {
            return Err(ValidationError::InvalidOrgUnitRoot);
        }
        if environment == Environment::Production && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InsecureApiBaseUrl("directory.api_base_url"));
        }
        Ok(())
    }
}

fn default_org_unit_root() -> String {
    "/public".to_string()
}

fn default_api_base_url() -> String {
    "https://admin.googleapis.com".to_string()
}
