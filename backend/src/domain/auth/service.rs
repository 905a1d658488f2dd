//! Login use-case: validate, resolve, verify, issue.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::{LoginCredentials, TokenIssuer, verify_password};
use crate::domain::Error;
use crate::domain::ports::{LoginService, UserRepository};
use crate::domain::validation::{Rule, RuleSet, Validator};
use crate::domain::User;

/// Message returned for every credential rejection, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Cannot authenticate, invalid email or password";

fn login_rules() -> RuleSet {
    RuleSet::new()
        .field("email", [Rule::Required, Rule::Email])
        .field("password", [Rule::Required])
}

/// Authenticates credentials against the user store and issues tokens.
///
/// Unknown emails, wrong passwords, unreadable hashes and failed lookups all
/// produce the same `401` so callers cannot probe which accounts exist. The
/// actual cause is logged.
#[derive(Clone)]
pub struct AuthenticationService {
    users: Arc<dyn UserRepository>,
    issuer: TokenIssuer,
    validator: Validator,
    rules: RuleSet,
}

impl AuthenticationService {
    pub fn new(users: Arc<dyn UserRepository>, issuer: TokenIssuer) -> Self {
        Self {
            users,
            issuer,
            validator: Validator::unverified(),
            rules: login_rules(),
        }
    }

    async fn resolve(&self, email: &str) -> Option<User> {
        match self.users.find_by_email(email).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                info!(user = email, reason = "unknown email", "authentication failed");
                None
            }
            Err(err) => {
                error!(user = email, error = %err, "user lookup failed during login");
                info!(user = email, reason = "lookup failed", "authentication failed");
                None
            }
        }
    }

    fn check_password(user: &User, credentials: &LoginCredentials) -> bool {
        let email = credentials.email();
        match verify_password(user.password_hash(), credentials.password()) {
            Ok(true) => {
                info!(user = email, "authentication successful");
                true
            }
            Ok(false) => {
                info!(user = email, reason = "password mismatch", "authentication failed");
                false
            }
            Err(err) => {
                error!(user = email, user_id = %user.user_id(), error = %err, "stored password hash unusable");
                info!(user = email, reason = "unusable hash", "authentication failed");
                false
            }
        }
    }
}

#[async_trait]
impl LoginService for AuthenticationService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        if let Err(err) = self.validator.validate(credentials, &self.rules).await {
            info!(user = credentials.email(), reason = %err, "authentication failed");
            return Err(err.into());
        }

        let user = self
            .resolve(credentials.email())
            .await
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        if !Self::check_password(&user, credentials) {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.issuer.issue(&user).map_err(|err| {
            error!(user = credentials.email(), error = %err, "token signing failed");
            Error::internal("failed to issue token")
        })?;
        info!(user = credentials.email(), user_id = %user.user_id(), "token issued");
        Ok(token)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
