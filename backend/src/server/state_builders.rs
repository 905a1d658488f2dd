//! Builders wiring repositories and services into HTTP state.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use keystone::domain::UserService;
use keystone::domain::auth::{AuthenticationService, TokenIssuer, TokenVerifier};
use keystone::domain::ports::{CreateUser, UserDirectory, UserRepository};
use keystone::inbound::http::state::HttpState;
use keystone::outbound::memory::InMemoryUserRepository;
use keystone::outbound::persistence::DieselUserRepository;

use super::ServerConfig;
use super::config::BootstrapAdmin;

/// Everything a worker needs to assemble the app.
#[derive(Clone)]
pub(crate) struct HttpDependencies {
    pub(crate) state: HttpState,
    pub(crate) verifier: TokenVerifier,
}

fn build_user_repository(config: &ServerConfig) -> Arc<dyn UserRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL user store");
            Arc::new(DieselUserRepository::new(pool.clone()))
        }
        None => {
            warn!("no database configured; accounts are held in memory and lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
    }
}

async fn ensure_admin(
    users: &dyn UserRepository,
    directory: &dyn UserDirectory,
    admin: &BootstrapAdmin,
) -> io::Result<()> {
    let exists = users
        .email_exists(admin.email.trim())
        .await
        .map_err(|err| io::Error::other(format!("admin lookup failed: {err}")))?;
    if exists {
        info!(email = admin.email.as_str(), "bootstrap admin already present");
        return Ok(());
    }
    let user = directory
        .create(CreateUser {
            first_name: admin.first_name.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            ..CreateUser::default()
        })
        .await
        .map_err(|err| io::Error::other(format!("failed to create bootstrap admin: {err}")))?;
    info!(email = user.email(), user_id = %user.user_id(), "bootstrap admin created");
    Ok(())
}

/// Build services over the configured store, sharing one clock, and create
/// the bootstrap admin when one is configured.
///
/// # Errors
/// An invalid token lifetime, or a store failure while creating the admin.
pub(crate) async fn build_http_dependencies(config: &ServerConfig) -> io::Result<HttpDependencies> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = build_user_repository(config);
    let issuer = TokenIssuer::new(&config.signing_key, config.token_ttl_hours, clock.clone())
        .map_err(|err| io::Error::other(format!("invalid token configuration: {err}")))?;
    let verifier = TokenVerifier::new(&config.signing_key, clock.clone());
    let login = Arc::new(AuthenticationService::new(users.clone(), issuer));
    let directory = Arc::new(UserService::new(users.clone(), config.hasher, clock));

    if let Some(admin) = &config.admin {
        ensure_admin(users.as_ref(), directory.as_ref(), admin).await?;
    }

    Ok(HttpDependencies {
        state: HttpState::new(login, directory),
        verifier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use keystone::domain::LoginCredentials;
    use keystone::domain::auth::{PasswordHasher, SigningKey};
    use keystone::domain::ports::LoginService;
    use rstest::rstest;

    fn config(ttl: u32) -> ServerConfig {
        ServerConfig::new(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            SigningKey::new("state-builder-key").expect("key"),
            ttl,
        )
        .with_hasher(PasswordHasher::new(4))
    }

    #[rstest]
    #[tokio::test]
    async fn zero_token_lifetime_is_rejected() {
        let err = build_http_dependencies(&config(0)).await.err().expect("error");
        assert!(err.to_string().contains("invalid token configuration"));
    }

    #[rstest]
    #[tokio::test]
    async fn bootstrap_admin_can_log_in() {
        let deps = build_http_dependencies(
            &config(1).with_admin(BootstrapAdmin::new("root@example.com", "s3cret", "Root")),
        )
        .await
        .expect("deps");

        let token = deps
            .state
            .login
            .login(&LoginCredentials::new("root@example.com", "s3cret"))
            .await
            .expect("login");
        let claims = deps.verifier.verify(&token).expect("verify");
        assert_eq!(claims.username, "root@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(deps.state.users.count().await.expect("count"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_admin_is_left_alone() {
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let directory = UserService::new(users.clone(), PasswordHasher::new(4), Arc::new(DefaultClock));
        let admin = BootstrapAdmin::new("root@example.com", "s3cret", "Root");

        ensure_admin(users.as_ref(), &directory, &admin).await.expect("first run");
        ensure_admin(users.as_ref(), &directory, &admin).await.expect("second run");

        assert_eq!(users.count().await.expect("count"), 1);
    }
}
