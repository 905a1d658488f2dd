//! Backend entry-point: loads settings, prepares the user store and serves
//! the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use keystone::inbound::http::health::HealthState;
use keystone::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use keystone::settings::{AdminSettings, DatabaseSettings, ServerSettings, TokenSettings};
use server::{BootstrapAdmin, ServerConfig, create_server};

/// Settings come from the environment and config files only; the process
/// arguments are not forwarded so each group parses the same empty CLI.
fn load<T: OrthoConfig>(group: &str) -> io::Result<T> {
    T::load_from_iter([OsString::from(env!("CARGO_PKG_NAME"))])
        .map_err(|err| io::Error::other(format!("failed to load {group} settings: {err}")))
}

async fn connect_database(settings: &DatabaseSettings) -> io::Result<Option<DbPool>> {
    let Some(url) = settings.url() else {
        return Ok(None);
    };
    if settings.run_migrations() {
        let url = url.to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
            .map_err(io::Error::other)?;
    }
    let config = PoolConfig::new(url).with_max_size(settings.max_connections());
    let pool = DbPool::new(config)
        .await
        .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let token_settings: TokenSettings = load("token")?;
    let server_settings: ServerSettings = load("server")?;
    let database_settings: DatabaseSettings = load("database")?;
    let admin_settings: AdminSettings = load("admin")?;

    let signing_key = token_settings
        .signing_key()
        .map_err(|err| io::Error::other(format!("JWT_SIGNING_KEY: {err}")))?;
    let mut config = ServerConfig::new(
        server_settings.bind_addr(),
        signing_key,
        token_settings.token_expiration_hours(),
    );
    if let Some(pool) = connect_database(&database_settings).await? {
        config = config.with_db_pool(pool);
    }
    if let Some((email, password)) = admin_settings.credentials() {
        config = config.with_admin(BootstrapAdmin::new(
            email,
            password,
            admin_settings.first_name(),
        ));
    }

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = server_settings.env(),
        %bind_addr,
        "server listening"
    );
    server.await
}
