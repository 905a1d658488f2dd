//! Driving port for account management.
//!
//! The HTTP user routes talk to this port only. Requests carry raw caller
//! input; the implementation validates, hashes and persists.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::validation::{FieldValue, Validatable};
use crate::domain::{Error, User, UserId};

/// Input for creating an account.
#[derive(Clone, Default)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub address: String,
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

impl Validatable for CreateUser {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "first_name" => FieldValue::Text(&self.first_name),
            "last_name" => FieldValue::Text(&self.last_name),
            "email" => FieldValue::Text(&self.email),
            "password" => FieldValue::Text(self.password.as_str()),
            "address" => FieldValue::Text(&self.address),
            _ => FieldValue::Absent,
        }
    }
}

/// Partial update: `None` leaves a field unchanged. A blank email counts as
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Validatable for UpdateUser {
    fn field(&self, name: &str) -> FieldValue<'_> {
        let value = match name {
            "first_name" => self.first_name.as_deref(),
            "last_name" => self.last_name.as_deref(),
            "email" => self.email.as_deref(),
            "address" => self.address.as_deref(),
            _ => None,
        };
        value.into()
    }
}

/// Account management use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch one user; `NotFound` when absent.
    async fn get(&self, id: &UserId) -> Result<User, Error>;

    /// Fetch a window of users, oldest first.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<User>, Error>;

    /// Number of stored accounts.
    async fn count(&self) -> Result<u64, Error>;

    /// Validate, hash and store a new account.
    async fn create(&self, request: CreateUser) -> Result<User, Error>;

    /// Apply a partial update; `NotFound` when absent.
    async fn update(&self, id: &UserId, request: UpdateUser) -> Result<User, Error>;

    /// Remove an account and return it; `NotFound` when absent.
    async fn delete(&self, id: &UserId) -> Result<User, Error>;
}
