//! Shared doubles and builders for unit tests.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::auth::PasswordHasher;
use crate::domain::{Identity, Role, User, UserId, UserParts};

/// Cheapest bcrypt cost, so tests do not spend seconds hashing.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Fixed instant used as "now" by clock fixtures.
pub fn fixed_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixture timestamp is valid"),
    }
}

/// Clock whose time only moves when a test says so.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(fixed_now())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Identity with fixed values, for token tests.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    id: String,
    username: String,
    role: String,
}

impl StaticIdentity {
    pub fn new(id: &str, username: &str, role: &str) -> Self {
        Self {
            id: id.to_owned(),
            username: username.to_owned(),
            role: role.to_owned(),
        }
    }
}

impl Identity for StaticIdentity {
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

/// Admin account with `password` hashed at [`TEST_BCRYPT_COST`].
pub fn stored_user(email: &str, password: &str) -> User {
    let password_hash = match PasswordHasher::new(TEST_BCRYPT_COST).hash(password) {
        Ok(hash) => hash,
        Err(err) => panic!("hash fixture password: {err}"),
    };
    User::from_parts(UserParts {
        id: UserId::random(),
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: email.to_owned(),
        password_hash,
        address: String::new(),
        role: Role::admin(),
        created_at: fixed_now(),
        updated_at: fixed_now(),
    })
}
