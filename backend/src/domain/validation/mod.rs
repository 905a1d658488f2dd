//! Declarative, first-error-only input validation.
//!
//! Each input shape declares a [`RuleSet`] once: an ordered list of fields,
//! each with an ordered list of [`Rule`]s drawn from a closed vocabulary.
//! [`Validator::validate`] walks fields and rules in declaration order and
//! stops at the first violation, reporting exactly one [`ValidationError`].
//!
//! ```
//! use keystone::domain::validation::{FieldValue, Rule, RuleSet, Validatable, Validator};
//!
//! struct Login<'a> {
//!     email: &'a str,
//! }
//!
//! impl Validatable for Login<'_> {
//!     fn field(&self, name: &str) -> FieldValue<'_> {
//!         match name {
//!             "email" => FieldValue::Text(self.email),
//!             _ => FieldValue::Absent,
//!         }
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let rules = RuleSet::new().field("email", [Rule::Required, Rule::Email]);
//! let err = Validator::unverified()
//!     .validate(&Login { email: "nope" }, &rules)
//!     .await
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "Email is not valid email");
//! # });
//! ```

mod uniqueness;

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use validator::ValidateEmail;

use super::Error;

#[cfg(test)]
pub use uniqueness::MockUniquenessCheck;
pub use uniqueness::{UniquenessCheck, UnverifiedUniqueness};

/// Collection and field a `unique` rule checks against, e.g. `users:email`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueTarget {
    pub collection: &'static str,
    pub field: &'static str,
}

impl UniqueTarget {
    pub const fn new(collection: &'static str, field: &'static str) -> Self {
        Self { collection, field }
    }
}

impl fmt::Display for UniqueTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.field)
    }
}

/// A single validation rule.
///
/// `gte`/`lte` compare numbers by value and text by character count. Every
/// rule except `required` lets empty or absent values through, so optional
/// fields are only checked when supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Gte(i64),
    Lte(i64),
    Unique(UniqueTarget),
}

impl Rule {
    /// Stable rule tag reported in error details.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Gte(_) => "gte",
            Self::Lte(_) => "lte",
            Self::Unique(_) => "unique",
        }
    }

    fn message(&self, label: &str) -> String {
        match self {
            Self::Required => format!("{label} is required"),
            Self::Email => format!("{label} is not valid email"),
            Self::Gte(bound) => format!("{label} value must be greater than {bound}"),
            Self::Lte(bound) => format!("{label} value must be lower than {bound}"),
            Self::Unique(_) => format!("{label} is already taken"),
        }
    }
}

/// A field value as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// The field was not supplied.
    Absent,
    Text(&'a str),
    Number(i64),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Absent, FieldValue::Text)
    }
}

impl FieldValue<'_> {
    fn is_blank(&self) -> bool {
        match self {
            Self::Absent => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Numeric value for bound checks: the number itself or the text length.
    fn magnitude(&self) -> Option<i64> {
        match self {
            Self::Absent => None,
            Self::Text(text) => Some(i64::try_from(text.chars().count()).unwrap_or(i64::MAX)),
            Self::Number(value) => Some(*value),
        }
    }
}

/// Inputs that expose their fields by wire name.
pub trait Validatable {
    /// Value of the named field; unknown names are [`FieldValue::Absent`].
    fn field(&self, name: &str) -> FieldValue<'_>;
}

/// Name a field takes in messages: the wire name in `PascalCase`, so
/// `first_name` reads `FirstName`.
pub fn display_name(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Ordered mapping from field name to ordered rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field with its rules. Declaration order is checking order.
    #[must_use]
    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[Rule])> {
        self.fields.iter().map(|(name, rules)| (*name, rules.as_slice()))
    }
}

/// The first violated rule of an input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    field: String,
    rule: &'static str,
    message: String,
}

impl ValidationError {
    fn violated(field: &str, rule: &Rule) -> Self {
        Self {
            field: field.to_owned(),
            rule: rule.tag(),
            message: rule.message(&display_name(field)),
        }
    }

    /// Wire name of the offending field, as reported in error details.
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn rule(&self) -> &'static str {
        self.rule
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.message.as_str())
            .with_details(json!({ "field": value.field, "rule": value.rule }))
    }
}

/// Failure of a validation run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidateError {
    /// The input broke a rule.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// A uniqueness lookup could not be completed.
    #[error("uniqueness lookup failed: {0}")]
    Lookup(Error),
}

impl From<ValidateError> for Error {
    fn from(value: ValidateError) -> Self {
        match value {
            ValidateError::Invalid(err) => err.into(),
            ValidateError::Lookup(err) => err,
        }
    }
}

/// Applies rule sets, delegating `unique` rules to an injected check.
#[derive(Clone)]
pub struct Validator {
    uniqueness: Arc<dyn UniquenessCheck>,
}

impl Validator {
    pub fn new(uniqueness: Arc<dyn UniquenessCheck>) -> Self {
        Self { uniqueness }
    }

    /// Validator whose `unique` rules accept everything (and say so in the log).
    pub fn unverified() -> Self {
        Self::new(Arc::new(UnverifiedUniqueness))
    }

    /// Check `input` against `rules`, stopping at the first violation.
    ///
    /// # Errors
    /// [`ValidateError::Invalid`] for the first broken rule, or
    /// [`ValidateError::Lookup`] when a uniqueness check fails to run.
    pub async fn validate<T>(&self, input: &T, rules: &RuleSet) -> Result<(), ValidateError>
    where
        T: Validatable + ?Sized,
    {
        for (name, field_rules) in rules.fields() {
            let value = input.field(name);
            for rule in field_rules {
                if !self.passes(rule, value).await? {
                    return Err(ValidationError::violated(name, rule).into());
                }
            }
        }
        Ok(())
    }

    async fn passes(&self, rule: &Rule, value: FieldValue<'_>) -> Result<bool, ValidateError> {
        if value.is_blank() {
            return Ok(!matches!(rule, Rule::Required));
        }
        let passed = match (rule, value) {
            (Rule::Required, _) => true,
            (Rule::Email, FieldValue::Text(text)) => text.validate_email(),
            (Rule::Email, _) => false,
            (Rule::Gte(bound), v) => v.magnitude().is_some_and(|m| m >= *bound),
            (Rule::Lte(bound), v) => v.magnitude().is_some_and(|m| m <= *bound),
            (Rule::Unique(target), FieldValue::Text(text)) => self
                .uniqueness
                .check_unique(target, text)
                .await
                .map_err(ValidateError::Lookup)?,
            (Rule::Unique(_), _) => true,
        };
        Ok(passed)
    }
}
