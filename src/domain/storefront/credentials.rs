//! Generated account credentials.
//!
//! Passwords are produced once at payment confirmation, handed to the
//! directory and the customer, and persisted only as an Argon2id hash.

use argon2::password_hash::rand_core::OsRng as SaltRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, Secret};

use crate::domain::foundation::{DomainError, ErrorCode};

use super::CanonicalEmail;

/// Random bytes behind a generated password (96 bits).
const PASSWORD_BYTES: usize = 12;

/// A freshly generated password: 24 lowercase hex characters.
#[derive(Clone)]
pub struct GeneratedPassword(Secret<String>);

impl GeneratedPassword {
    /// Draws a new password from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; PASSWORD_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(Secret::new(hex::encode(bytes)))
    }

    /// Exposes the plaintext. Only the directory call and the one-time
    /// disclosure to the customer should need this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for GeneratedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GeneratedPassword([REDACTED])")
    }
}

/// Credentials disclosed to the customer exactly once.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub username: CanonicalEmail,
    pub password: GeneratedPassword,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy)]
pub struct HashingCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingCost {
    fn default() -> Self {
        // OWASP minimum for Argon2id
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashingCost {
    /// Cheap parameters for tests.
    #[cfg(test)]
    pub fn fast() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Hashes and verifies account passwords with Argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    cost: HashingCost,
}

impl PasswordHasher {
    pub fn new(cost: HashingCost) -> Self {
        Self { cost }
    }

    /// Produces a PHC-formatted hash string.
    pub fn hash(&self, password: &GeneratedPassword) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut SaltRng);
        self.argon2()?
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                DomainError::new(ErrorCode::InternalError, format!("Password hashing failed: {}", e))
            })
    }

    /// Checks a candidate password against a stored hash.
    pub fn verify(&self, candidate: &str, hash: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Invalid password hash: {}", e))
        })?;
        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }

    fn argon2(&self) -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(
            self.cost.memory_kib,
            self.cost.iterations,
            self.cost.parallelism,
            None,
        )
        .map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Invalid Argon2 params: {}", e))
        })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
