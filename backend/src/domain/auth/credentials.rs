//! Login credentials as received from a caller.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::validation::{FieldValue, Validatable};

/// Email and plaintext password supplied to `POST /login`.
///
/// Shape checks (required, email format) are left to the validator so the
/// caller sees the same messages as every other input. The password is held
/// in zeroising memory and never appears in `Debug` output.
///
/// # Examples
/// ```
/// use keystone::domain::LoginCredentials;
///
/// let creds = LoginCredentials::new(" ada@example.com ", "secret");
/// assert_eq!(creds.email(), "ada@example.com");
/// assert!(!format!("{creds:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Capture raw inputs. The email is trimmed; the password is kept verbatim.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_owned(),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validatable for LoginCredentials {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "email" => FieldValue::Text(&self.email),
            "password" => FieldValue::Text(self.password()),
            _ => FieldValue::Absent,
        }
    }
}
