//! Driving port for the login use-case.
//!
//! Inbound adapters call this to exchange credentials for a bearer token
//! without knowing how users are stored or tokens are signed, which lets HTTP
//! tests substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Exchanges credentials for a signed access token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return a signed token for valid credentials.
    ///
    /// Errors are `InvalidRequest` for malformed input and `Unauthorized` for
    /// every credential rejection.
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error>;
}
