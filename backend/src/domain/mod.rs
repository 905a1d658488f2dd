//! Domain model, use-cases and ports.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters call the driving
//! ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`UserId`], [`Role`]: account model.
//! - [`Identity`]: the view of a principal that tokens are minted from.
//! - [`auth`]: credentials, password hashing, tokens and the login service.
//! - [`validation`]: declarative first-error-only input rules.
//! - [`UserService`]: account management over a [`ports::UserRepository`].

pub mod auth;
pub mod error;
mod identity;
pub mod ports;
mod trace_id;
pub mod user;
mod user_service;
pub mod validation;

pub use self::auth::LoginCredentials;
pub use self::error::{Error, ErrorCode};
pub use self::identity::Identity;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Role, User, UserId, UserParts, UserValidationError};
pub use self::user_service::{RepositoryUniqueness, USERS_EMAIL, UserService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use keystone::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
