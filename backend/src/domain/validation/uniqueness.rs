//! Pluggable implementation of the `unique` rule.

use async_trait::async_trait;
use tracing::warn;

use super::UniqueTarget;
use crate::domain::Error;

/// Answers whether `value` is not yet used for `target`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UniquenessCheck: Send + Sync {
    /// Return `Ok(true)` when no existing record holds `value`.
    async fn check_unique(&self, target: &UniqueTarget, value: &str) -> Result<bool, Error>;
}

/// Placeholder that accepts every value.
///
/// Only suitable where no store is wired; every call logs a warning so the
/// gap is visible in production logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnverifiedUniqueness;

#[async_trait]
impl UniquenessCheck for UnverifiedUniqueness {
    async fn check_unique(&self, target: &UniqueTarget, _value: &str) -> Result<bool, Error> {
        warn!(%target, "uniqueness not verified: no store is wired for this rule");
        Ok(true)
    }
}
