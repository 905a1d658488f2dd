//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserDirectory>,
}

impl HttpState {
    /// Construct state from the port implementations.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use keystone::domain::ports::{LoginService, UserDirectory};
    /// use keystone::inbound::http::state::HttpState;
    ///
    /// fn build(login: Arc<dyn LoginService>, users: Arc<dyn UserDirectory>) -> HttpState {
    ///     HttpState::new(login, users)
    /// }
    /// ```
    pub fn new(login: Arc<dyn LoginService>, users: Arc<dyn UserDirectory>) -> Self {
        Self { login, users }
    }
}
