//! Account management backed by a [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::auth::PasswordHasher;
use crate::domain::ports::{
    CreateUser, UpdateUser, UserDirectory, UserPersistenceError, UserRepository,
};
use crate::domain::validation::{Rule, RuleSet, UniqueTarget, UniquenessCheck, Validator};
use crate::domain::{Error, Role, User, UserId, UserParts};

/// Email uniqueness across all accounts.
pub const USERS_EMAIL: UniqueTarget = UniqueTarget::new("users", "email");

fn create_rules() -> RuleSet {
    RuleSet::new()
        .field("first_name", [Rule::Required])
        .field("email", [Rule::Required, Rule::Email, Rule::Unique(USERS_EMAIL)])
        .field("password", [Rule::Required])
}

fn update_rules() -> RuleSet {
    RuleSet::new().field("email", [Rule::Email])
}

fn not_found() -> Error {
    Error::not_found("user not found")
}

fn log_failure(action: &'static str, err: &UserPersistenceError) {
    error!(action, error = %err, "user store operation failed");
}

/// `unique` rule backed by the user store.
pub struct RepositoryUniqueness {
    users: Arc<dyn UserRepository>,
}

impl RepositoryUniqueness {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UniquenessCheck for RepositoryUniqueness {
    async fn check_unique(&self, target: &UniqueTarget, value: &str) -> Result<bool, Error> {
        if *target != USERS_EMAIL {
            return Err(Error::internal(format!("no uniqueness check for {target}")));
        }
        let exists = self.users.email_exists(value).await.map_err(|err| {
            log_failure("email_exists", &err);
            Error::from(err)
        })?;
        Ok(!exists)
    }
}

/// [`UserDirectory`] implementation: validates input, hashes passwords and
/// stamps audit times before delegating to the repository.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    validator: Validator,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let validator = Validator::new(Arc::new(RepositoryUniqueness::new(users.clone())));
        Self {
            users,
            validator,
            hasher,
            clock,
        }
    }

    async fn existing(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(|err| {
                log_failure("find_by_id", &err);
                Error::from(err)
            })?
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.existing(id).await
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<User>, Error> {
        self.users.list(offset, limit).await.map_err(|err| {
            log_failure("list", &err);
            Error::from(err)
        })
    }

    async fn count(&self) -> Result<u64, Error> {
        self.users.count().await.map_err(|err| {
            log_failure("count", &err);
            Error::from(err)
        })
    }

    async fn create(&self, request: CreateUser) -> Result<User, Error> {
        let request = CreateUser {
            email: request.email.trim().to_owned(),
            ..request
        };
        self.validator.validate(&request, &create_rules()).await?;

        let password_hash = self.hasher.hash(request.password.as_str()).map_err(|err| {
            error!(error = %err, "password hashing failed");
            Error::internal("failed to hash password")
        })?;
        let now = self.clock.utc();
        let CreateUser {
            first_name,
            last_name,
            email,
            address,
            ..
        } = request;
        let user = User::from_parts(UserParts {
            id: UserId::random(),
            first_name,
            last_name,
            email,
            password_hash,
            address,
            role: Role::default(),
            created_at: now,
            updated_at: now,
        });

        self.users.insert(&user).await.map_err(|err| {
            log_failure("insert", &err);
            Error::from(err)
        })?;
        info!(user_id = %user.user_id(), "user created");
        Ok(user)
    }

    async fn update(&self, id: &UserId, request: UpdateUser) -> Result<User, Error> {
        let request = UpdateUser {
            email: request
                .email
                .map(|email| email.trim().to_owned())
                .filter(|email| !email.is_empty()),
            ..request
        };
        self.validator.validate(&request, &update_rules()).await?;

        let current = self.existing(id).await?.into_parts();
        let UpdateUser {
            first_name,
            last_name,
            email,
            address,
        } = request;
        let updated = User::from_parts(UserParts {
            first_name: first_name.unwrap_or(current.first_name),
            last_name: last_name.unwrap_or(current.last_name),
            email: email.unwrap_or(current.email),
            address: address.unwrap_or(current.address),
            updated_at: self.clock.utc(),
            ..current
        });

        let found = self.users.update(&updated).await.map_err(|err| {
            log_failure("update", &err);
            Error::from(err)
        })?;
        if !found {
            return Err(not_found());
        }
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    async fn delete(&self, id: &UserId) -> Result<User, Error> {
        let user = self.existing(id).await?;
        let found = self.users.delete(id).await.map_err(|err| {
            log_failure("delete", &err);
            Error::from(err)
        })?;
        if !found {
            return Err(not_found());
        }
        info!(user_id = %id, "user deleted");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
