//! Google Workspace directory provisioner.
//!
//! Implements `DirectoryProvisioner` over the Admin SDK Directory API
//! `users.insert` call. Each plan tier maps to its own organizational
//! unit under the configured root.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Serialize;

use super::{AccessTokenSource, ServiceAccountKey};
use crate::ports::{DirectoryError, DirectoryProvisioner, ProvisionAccountRequest};

const DEFAULT_API_BASE_URL: &str = "https://admin.googleapis.com";

/// Settings for the Directory API client.
#[derive(Debug, Clone)]
pub struct GoogleDirectoryConfig {
    pub key: ServiceAccountKey,
    /// Workspace admin the service account acts as.
    pub delegated_admin_email: String,
    /// Parent of the per-plan organizational units (e.g. `/public`).
    pub org_unit_root: String,
    pub api_base_url: String,
}

impl GoogleDirectoryConfig {
    pub fn new(
        key: ServiceAccountKey,
        delegated_admin_email: impl Into<String>,
        org_unit_root: impl Into<String>,
    ) -> Self {
        Self {
            key,
            delegated_admin_email: delegated_admin_email.into(),
            org_unit_root: org_unit_root.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserName<'a> {
    given_name: &'a str,
    family_name: &'a str,
}

/// `users.insert` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertUserBody<'a> {
    name: UserName<'a>,
    password: &'a str,
    primary_email: &'a str,
    org_unit_path: String,
}

pub struct GoogleDirectoryProvisioner {
    tokens: AccessTokenSource,
    org_unit_root: String,
    users_url: String,
    http_client: reqwest::Client,
}

impl GoogleDirectoryProvisioner {
    pub fn new(config: GoogleDirectoryConfig) -> Self {
        Self {
            tokens: AccessTokenSource::new(config.key, config.delegated_admin_email),
            users_url: format!(
                "{}/admin/directory/v1/users",
                config.api_base_url.trim_end_matches('/')
            ),
            org_unit_root: config.org_unit_root,
            http_client: reqwest::Client::new(),
        }
    }

    /// Organizational unit for a plan tier.
    pub fn org_unit_path(&self, plan_tier: &str) -> String {
        format!("{}/{}", self.org_unit_root.trim_end_matches('/'), plan_tier)
    }

    fn insert_body<'a>(&self, request: &'a ProvisionAccountRequest) -> InsertUserBody<'a> {
        InsertUserBody {
            name: UserName {
                given_name: &request.first_name,
                family_name: &request.last_name,
            },
            password: request.password.expose(),
            primary_email: request.email.as_str(),
            org_unit_path: self.org_unit_path(request.plan_tier.as_str()),
        }
    }
}

#[async_trait]
impl DirectoryProvisioner for GoogleDirectoryProvisioner {
    async fn create_account(&self, request: ProvisionAccountRequest) -> Result<(), DirectoryError> {
        let token = self.tokens.access_token().await?;
        let body = self.insert_body(&request);

        let response = self
            .http_client
            .post(&self.users_url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DirectoryError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                email = %request.email,
                org_unit = %body.org_unit_path,
                "Directory user created"
            );
            return Ok(());
        }

        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            email = %request.email,
            error = %error_text,
            "Directory users.insert failed"
        );

        Err(match status {
            reqwest::StatusCode::CONFLICT => DirectoryError::already_exists(&request.email),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                DirectoryError::authentication(format!("HTTP {}", status.as_u16()))
            }
            _ => DirectoryError::provider(format!("HTTP {}: {}", status.as_u16(), error_text)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::service_account::fixtures::key_json;
    use super::*;
    use crate::domain::storefront::{CanonicalEmail, GeneratedPassword, PlanId};

    fn provisioner(root: &str) -> GoogleDirectoryProvisioner {
        let key = ServiceAccountKey::from_json(&key_json(None)).unwrap();
        GoogleDirectoryProvisioner::new(
            GoogleDirectoryConfig::new(key, "admin@wecloudstorage.in", root)
                .with_base_url("http://localhost:8089/"),
        )
    }

    fn request() -> ProvisionAccountRequest {
        ProvisionAccountRequest {
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            email: CanonicalEmail::from_raw("alice@gmail.com").unwrap(),
            password: GeneratedPassword::generate(),
            plan_tier: PlanId::new("2TB"),
        }
    }

    #[test]
    fn org_unit_per_plan_tier() {
        assert_eq!(provisioner("/public").org_unit_path("1TB"), "/public/1TB");
        assert_eq!(provisioner("/public/").org_unit_path("5TB"), "/public/5TB");
    }

    #[test]
    fn users_url_joins_base() {
        assert_eq!(
            provisioner("/public").users_url,
            "http://localhost:8089/admin/directory/v1/users"
        );
    }

    #[test]
    fn insert_body_matches_directory_schema() {
        let provisioner = provisioner("/public");
        let request = request();

        let json = serde_json::to_value(provisioner.insert_body(&request)).unwrap();

        assert_eq!(json["name"]["givenName"], "Alice");
        assert_eq!(json["name"]["familyName"], "Liddell");
        assert_eq!(json["primaryEmail"], "alice@wecloudstorage.in");
        assert_eq!(json["orgUnitPath"], "/public/2TB");
        assert_eq!(json["password"], request.password.expose());
    }
}
