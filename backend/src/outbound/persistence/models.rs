//! Internal Diesel row structs for the users table.
//!
//! These never leave the persistence layer; repositories convert them to and
//! from [`crate::domain::User`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::users;
use crate::domain::auth::PasswordHash;
use crate::domain::{Role, User, UserId, UserParts};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_parts(UserParts {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: PasswordHash::new(row.password_hash),
            address: row.address,
            role: Role::new(row.role),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub address: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.user_id().as_uuid(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            email: user.email(),
            password_hash: user.password_hash().as_str(),
            address: user.address(),
            role: user.user_role().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Mutable columns. Identity, hash and creation time are never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub address: &'a str,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            first_name: user.first_name(),
            last_name: user.last_name(),
            email: user.email(),
            address: user.address(),
            updated_at: user.updated_at(),
        }
    }
}
