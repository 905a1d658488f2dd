//! Runtime settings loaded via OrthoConfig.
//!
//! Each group reads its own environment prefix (`JWT_`, `APP_`, `DB_`,
//! `ADMIN_`) and optional config file. Every group carries at least one
//! defaulted field so it loads with none of its variables set; the remaining
//! optional fields fall back through the accessor methods.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::auth::{SigningKey, TokenConfigError};

/// Token lifetime used when `JWT_TOKEN_EXPIRATION` is unset.
pub const DEFAULT_TOKEN_EXPIRATION_HOURS: u32 = 72;
pub const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ADMIN_FIRST_NAME: &str = "Admin";

/// Bearer token signing configuration.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JWT")]
pub struct TokenSettings {
    /// HMAC secret shared by the issuer and the verifier.
    pub signing_key: Option<String>,
    /// Token lifetime in hours.
    #[ortho_config(default = DEFAULT_TOKEN_EXPIRATION_HOURS)]
    pub token_expiration: u32,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field("token_expiration", &self.token_expiration)
            .finish()
    }
}

impl TokenSettings {
    /// Validated signing key. A missing or blank key is a startup error.
    pub fn signing_key(&self) -> Result<SigningKey, TokenConfigError> {
        SigningKey::new(self.signing_key.as_deref().unwrap_or_default())
    }

    pub fn token_expiration_hours(&self) -> u32 {
        self.token_expiration
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct ServerSettings {
    /// Deployment label recorded in the startup log.
    pub env: Option<String>,
    pub host: Option<IpAddr>,
    #[ortho_config(default = DEFAULT_PORT)]
    pub port: u16,
}

impl ServerSettings {
    pub fn env(&self) -> &str {
        self.env.as_deref().unwrap_or("development")
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port,
        )
    }
}

/// Database configuration. Without a URL the in-memory store is used.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL.
    pub url: Option<String>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    #[ortho_config(default = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("run_migrations", &self.run_migrations)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    /// Configured URL, ignoring blank values.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }
}

/// Account created at startup when no account holds its email yet.
///
/// Routes under `/users` need an admin token, so a fresh deployment has no
/// other way to obtain its first account.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ADMIN")]
pub struct AdminSettings {
    pub email: Option<String>,
    pub password: Option<String>,
    #[ortho_config(default = DEFAULT_ADMIN_FIRST_NAME.to_owned())]
    pub first_name: String,
}

impl std::fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSettings")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("first_name", &self.first_name)
            .finish()
    }
}

impl AdminSettings {
    /// Email and password when both are set and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }
}
