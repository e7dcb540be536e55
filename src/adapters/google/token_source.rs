//! OAuth2 access tokens for a service account with domain-wide delegation.
//!
//! Signs an RS256 JWT assertion naming the delegated admin as subject,
//! exchanges it at the token endpoint and caches the access token until
//! shortly before it expires.

use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::ServiceAccountKey;
use crate::ports::DirectoryError;

/// Scope for creating directory users.
pub const DIRECTORY_USER_SCOPE: &str = "https://www.googleapis.com/auth/admin.directory.user";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

pub struct AccessTokenSource {
    key: ServiceAccountKey,
    delegated_admin: String,
    http_client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
}

impl AccessTokenSource {
    pub fn new(key: ServiceAccountKey, delegated_admin: impl Into<String>) -> Self {
        Self {
            key,
            delegated_admin: delegated_admin.into(),
            http_client: reqwest::Client::new(),
            cached: RwLock::new(None),
        }
    }

    /// Returns a valid access token, fetching a new one when needed.
    pub async fn access_token(&self) -> Result<SecretString, DirectoryError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.token.clone());
            }
        }

        let mut slot = self.cached.write().await;
        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.refresh_at {
                return Ok(cached.token.clone());
            }
        }

        let response = self.exchange().await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);
        let token = SecretString::new(response.access_token);
        *slot = Some(CachedToken {
            token: token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        tracing::debug!(expires_in = response.expires_in, "Directory access token refreshed");
        Ok(token)
    }

    pub(crate) fn claims(&self, now_unix: i64) -> AssertionClaims {
        AssertionClaims {
            iss: self.key.client_email.clone(),
            sub: self.delegated_admin.clone(),
            scope: DIRECTORY_USER_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now_unix,
            exp: now_unix + ASSERTION_LIFETIME_SECS,
        }
    }

    pub(crate) fn signed_assertion(&self, now_unix: i64) -> Result<String, DirectoryError> {
        let key = EncodingKey::from_rsa_pem(self.key.private_key_pem().as_bytes())
            .map_err(|e| DirectoryError::authentication(format!("Invalid private key: {}", e)))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &self.claims(now_unix), &key)
            .map_err(|e| DirectoryError::authentication(format!("Failed to sign assertion: {}", e)))
    }

    async fn exchange(&self) -> Result<TokenResponse, DirectoryError> {
        let assertion = self.signed_assertion(chrono::Utc::now().timestamp())?;

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DirectoryError::network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %error_text, "Token exchange failed");
            return Err(DirectoryError::authentication(format!(
                "Token exchange failed with HTTP {}",
                status.as_u16()
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| DirectoryError::authentication(format!("Invalid token response: {}", e)))
    }

    #[cfg(test)]
    async fn seed(&self, token: &str, valid_for: Duration) {
        *self.cached.write().await = Some(CachedToken {
            token: SecretString::new(token.to_string()),
            refresh_at: Instant::now() + valid_for,
        });
    }
}

impl std::fmt::Debug for AccessTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenSource")
            .field("client_email", &self.key.client_email)
            .field("delegated_admin", &self.delegated_admin)
            .finish_non_exhaustive()
    }
}
