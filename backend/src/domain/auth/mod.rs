//! Authentication: credentials, password hashing, bearer tokens and the
//! login use-case that ties them together.

mod credentials;
mod password;
mod service;
mod token;

pub use credentials::LoginCredentials;
pub use password::{PasswordError, PasswordHash, PasswordHasher, verify_password};
pub use service::{AuthenticationService, INVALID_CREDENTIALS};
pub use token::{Claims, SigningKey, TokenConfigError, TokenError, TokenIssuer, TokenVerifier};
