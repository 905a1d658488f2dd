//! User account model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Identity;
use super::auth::PasswordHash;

/// Validation errors returned when parsing user identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
}

/// Stable user identifier stored as a UUID.
///
/// The canonical string form is kept alongside the parsed value so
/// [`Identity::id`] can lend it out without reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self::from_uuid)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.1
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role granted to an account and embedded in issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Role required by the user management routes.
    pub const ADMIN: &'static str = "admin";

    /// Wrap a role name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The administrator role.
    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    /// Role name as carried in token claims.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Role {
    /// Every account is an administrator until role management exists.
    fn default() -> Self {
        Self::admin()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Field values used to assemble a [`User`].
#[derive(Debug, Clone)]
pub struct UserParts {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application user.
///
/// The password hash is never serialised; the wire representation exposes
/// only profile fields and audit timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    #[serde(skip)]
    password_hash: PasswordHash,
    #[schema(example = "12 St James's Square, London")]
    address: String,
    #[schema(value_type = String, example = "admin")]
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from its parts.
    pub fn from_parts(parts: UserParts) -> Self {
        let UserParts {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            address,
            role,
            created_at,
            updated_at,
        } = parts;
        Self {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            address,
            role,
            created_at,
            updated_at,
        }
    }

    /// Decompose into parts, typically to apply an update.
    pub fn into_parts(self) -> UserParts {
        UserParts {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            address: self.address,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn user_role(&self) -> &Role {
        &self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Identity for User {
    fn id(&self) -> &str {
        self.id.as_ref()
    }

    /// Accounts log in with their email address.
    fn username(&self) -> &str {
        &self.email
    }

    fn role(&self) -> &str {
        self.role.as_str()
    }
}

#[cfg(test)]
mod tests;
