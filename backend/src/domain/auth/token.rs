//! HS256 bearer tokens: issuing on login and verifying on protected routes.
//!
//! Both halves share a [`SigningKey`] that is validated once at startup.
//! Expiry is computed and checked against an injected [`Clock`] rather than
//! the system clock, so tests can move time.

use std::fmt;
use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::Identity;

/// Construction-time configuration errors. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenConfigError {
    #[error("token signing key must not be empty")]
    EmptySigningKey,
    #[error("token lifetime must be at least one hour")]
    ZeroLifetime,
    #[error("token lifetime of {hours} hours is out of range")]
    LifetimeOutOfRange { hours: u32 },
}

/// Per-token failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("token has expired")]
    Expired,
    #[error("token is invalid: {0}")]
    Invalid(String),
}

/// Shared HMAC secret, validated non-empty.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Accept a secret, rejecting blank input.
    pub fn new(secret: &str) -> Result<Self, TokenConfigError> {
        if secret.trim().is_empty() {
            return Err(TokenConfigError::EmptySigningKey);
        }
        Ok(Self(Zeroizing::new(secret.as_bytes().to_vec())))
    }

    fn bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Claims carried by every issued token.
///
/// `role` is optional on the wire and decodes to an empty string when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

impl Identity for Claims {
    fn id(&self) -> &str {
        &self.id
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn role(&self) -> &str {
        &self.role
    }
}

/// Mints signed tokens for authenticated identities.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    lifetime: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Build an issuer whose tokens live for `ttl_hours`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use keystone::domain::auth::{SigningKey, TokenIssuer, TokenVerifier};
    /// use mockable::DefaultClock;
    ///
    /// let key = SigningKey::new("not-a-production-key").unwrap();
    /// let issuer = TokenIssuer::new(&key, 72, Arc::new(DefaultClock)).unwrap();
    /// let verifier = TokenVerifier::new(&key, Arc::new(DefaultClock));
    /// # struct Ada;
    /// # impl keystone::domain::Identity for Ada {
    /// #     fn id(&self) -> &str { "3fa85f64-5717-4562-b3fc-2c963f66afa6" }
    /// #     fn username(&self) -> &str { "ada@example.com" }
    /// #     fn role(&self) -> &str { "admin" }
    /// # }
    /// let token = issuer.issue(&Ada).unwrap();
    /// assert_eq!(verifier.verify(&token).unwrap().username, "ada@example.com");
    /// ```
    pub fn new(
        key: &SigningKey,
        ttl_hours: u32,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenConfigError> {
        if ttl_hours == 0 {
            return Err(TokenConfigError::ZeroLifetime);
        }
        let lifetime = TimeDelta::try_hours(i64::from(ttl_hours))
            .ok_or(TokenConfigError::LifetimeOutOfRange { hours: ttl_hours })?;
        Ok(Self {
            key: EncodingKey::from_secret(key.bytes()),
            lifetime,
            clock,
        })
    }

    /// Sign claims derived from `identity`, expiring one lifetime from now.
    pub fn issue<I>(&self, identity: &I) -> Result<String, TokenError>
    where
        I: Identity + ?Sized,
    {
        let claims = Claims {
            id: identity.id().to_owned(),
            username: identity.username().to_owned(),
            role: identity.role().to_owned(),
            exp: (self.clock.utc() + self.lifetime).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|err| TokenError::Signing(err.to_string()))
    }
}

/// Checks signature, algorithm and expiry of inbound tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(key: &SigningKey, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against the injected clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            key: DecodingKey::from_secret(key.bytes()),
            validation,
            clock,
        }
    }

    /// Decode `token` and return its claims if it is authentic and unexpired.
    ///
    /// A token is still valid during its `exp` second.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| TokenError::Invalid(err.to_string()))?;
        if data.claims.exp < self.clock.utc().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
