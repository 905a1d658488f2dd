//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use keystone::domain::auth::{PasswordHasher, SigningKey};
use keystone::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Account ensured at startup.
pub struct BootstrapAdmin {
    pub(crate) email: String,
    pub(crate) password: Zeroizing<String>,
    pub(crate) first_name: String,
}

impl BootstrapAdmin {
    pub fn new(email: &str, password: &str, first_name: &str) -> Self {
        Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            first_name: first_name.to_owned(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) signing_key: SigningKey,
    pub(crate) token_ttl_hours: u32,
    pub(crate) hasher: PasswordHasher,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Configuration with the in-memory user store and the default bcrypt cost.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, signing_key: SigningKey, token_ttl_hours: u32) -> Self {
        Self {
            bind_addr,
            signing_key,
            token_ttl_hours,
            hasher: PasswordHasher::default(),
            db_pool: None,
            admin: None,
        }
    }

    /// Store accounts in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Create `admin` on startup unless its email is already registered.
    #[must_use]
    pub fn with_admin(mut self, admin: BootstrapAdmin) -> Self {
        self.admin = Some(admin);
        self
    }

    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "cost is tuned down only by tests")
    )]
    #[must_use]
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
