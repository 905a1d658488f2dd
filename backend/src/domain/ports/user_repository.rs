//! Driven port for user persistence and its errors.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(value: UserPersistenceError) -> Self {
        match value {
            UserPersistenceError::Connection { .. } => {
                Self::service_unavailable("user store unavailable")
            }
            UserPersistenceError::Query { message } => Self::internal(message),
            UserPersistenceError::DuplicateEmail { .. } => Self::conflict("Email is already taken"),
        }
    }
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by login email (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Whether any account uses `email`.
    async fn email_exists(&self, email: &str) -> Result<bool, UserPersistenceError>;

    /// A window of users ordered by creation time.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<User>, UserPersistenceError>;

    /// Total number of users.
    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Insert a new user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite an existing user; `Ok(false)` when no row matched.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Remove a user; `Ok(false)` when no row matched.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
