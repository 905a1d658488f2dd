//! bcrypt hashing and verification of account passwords.

use std::fmt;

/// Stored bcrypt hash of a password, including its cost and salt.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash read from storage. The format is only checked on verify.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Errors raised by [`PasswordHasher`] and [`verify_password`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// Check `supplied` against `stored`.
///
/// A mismatch is `Ok(false)`; only an unparsable stored hash is an error.
///
/// # Examples
/// ```
/// use keystone::domain::auth::{PasswordHasher, verify_password};
///
/// let hash = PasswordHasher::new(4).hash("secret").unwrap();
/// assert!(verify_password(&hash, "secret").unwrap());
/// assert!(!verify_password(&hash, "wrong").unwrap());
/// ```
pub fn verify_password(stored: &PasswordHash, supplied: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(supplied, stored.as_str())
        .map_err(|err| PasswordError::MalformedHash(err.to_string()))
}

/// Produces bcrypt hashes at a fixed cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordError> {
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash)
            .map_err(|err| PasswordError::Hashing(err.to_string()))
    }
}
