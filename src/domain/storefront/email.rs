//! Canonical organizational email addresses.
//!
//! Every account lives under the organization's own domain: the customer's
//! local part is kept and the domain is replaced.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Domain every provisioned account is created under.
pub const ORGANIZATION_DOMAIN: &str = "wecloudstorage.in";

/// Maps a raw email to its canonical organizational address.
///
/// Takes the text before the first `@` (the whole input when there is none)
/// and appends [`ORGANIZATION_DOMAIN`]. No other validation happens here.
pub fn normalize_email(raw: &str) -> String {
    let local_part = raw.split('@').next().unwrap_or_default();
    format!("{}@{}", local_part, ORGANIZATION_DOMAIN)
}

/// Validated canonical email, the permanent identifier of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalEmail(String);

impl CanonicalEmail {
    /// Validates a customer-supplied email and normalizes it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the input is empty, has no `@`, has an
    /// empty local part, or contains whitespace inside the local part.
    pub fn from_raw(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        let (local_part, _) = trimmed
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing @ symbol"))?;
        if local_part.is_empty() {
            return Err(ValidationError::invalid_format("email", "empty local part"));
        }
        if local_part.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "email",
                "local part contains whitespace",
            ));
        }
        Ok(Self(normalize_email(trimmed)))
    }

    /// Restores a canonical email read back from storage.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the value is not under the organization domain.
    pub fn from_canonical(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match value.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain == ORGANIZATION_DOMAIN => {
                Ok(Self(value))
            }
            _ => Err(ValidationError::invalid_format(
                "email",
                format!("not an address under {}", ORGANIZATION_DOMAIN),
            )),
        }
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part before `@`.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl fmt::Display for CanonicalEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_replaces_domain() {
        assert_eq!(normalize_email("alice@gmail.com"), "alice@wecloudstorage.in");
    }

    #[test]
    fn normalize_splits_on_first_at() {
        assert_eq!(normalize_email("a@b@c"), "a@wecloudstorage.in");
    }

    #[test]
    fn normalize_without_at_keeps_whole_input() {
        assert_eq!(normalize_email("bob"), "bob@wecloudstorage.in");
        assert_eq!(normalize_email(""), "@wecloudstorage.in");
    }

    #[test]
    fn from_raw_accepts_and_trims() {
        let email = CanonicalEmail::from_raw("  alice@gmail.com ").unwrap();
        assert_eq!(email.as_str(), "alice@wecloudstorage.in");
        assert_eq!(email.local_part(), "alice");
    }

    #[test]
    fn from_raw_rejects_missing_at() {
        let err = CanonicalEmail::from_raw("alice").unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn from_raw_rejects_empty_local_part() {
        assert!(CanonicalEmail::from_raw("@gmail.com").is_err());
        assert!(CanonicalEmail::from_raw("").is_err());
        assert!(CanonicalEmail::from_raw("al ice@gmail.com").is_err());
    }

    #[test]
    fn from_canonical_requires_organization_domain() {
        assert!(CanonicalEmail::from_canonical("alice@wecloudstorage.in").is_ok());
        assert!(CanonicalEmail::from_canonical("alice@gmail.com").is_err());
        assert!(CanonicalEmail::from_canonical("@wecloudstorage.in").is_err());
    }

    proptest! {
        #[test]
        fn normalize_is_deterministic(raw in ".*") {
            prop_assert_eq!(normalize_email(&raw), normalize_email(&raw));
        }

        #[test]
        fn normalize_is_idempotent(raw in ".*") {
            let once = normalize_email(&raw);
            prop_assert_eq!(normalize_email(&once), once.clone());
        }

        #[test]
        fn canonical_email_is_fixed_point(local in "[a-z0-9._%+-]{1,32}", domain in "[a-z]{1,12}\\.[a-z]{2,4}") {
            let first = CanonicalEmail::from_raw(&format!("{}@{}", local, domain)).unwrap();
            let second = CanonicalEmail::from_raw(first.as_str()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
