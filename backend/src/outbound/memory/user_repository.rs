//! Volatile [`UserRepository`] kept behind an async lock.
//!
//! Users are held in insertion order, which doubles as creation order for
//! paging. Email uniqueness is enforced on insert and update the same way the
//! database's unique index does.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a fixed set of accounts.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }
}

fn email_taken_by_other(users: &[User], candidate: &User) -> bool {
    users
        .iter()
        .any(|u| u.email() == candidate.email() && u.user_id() != candidate.user_id())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user_id() == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email() == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email() == email))
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<User>, UserPersistenceError> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let users = self.users.read().await;
        Ok(users.iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let users = self.users.read().await;
        u64::try_from(users.len()).map_err(|err| UserPersistenceError::query(err.to_string()))
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        if users.iter().any(|u| u.user_id() == user.user_id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.user_id()
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.write().await;
        if email_taken_by_other(&users, user) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        match users.iter_mut().find(|u| u.user_id() == user.user_id()) {
            Some(slot) => {
                *slot = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.user_id() != id);
        Ok(users.len() != before)
    }
}
