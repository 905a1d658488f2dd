//! Minimal principal view used by authentication.

/// The attributes a signed token is derived from.
///
/// Authentication only needs these three values, so it depends on this
/// capability rather than on the full user record.
pub trait Identity {
    /// Unique identifier, carried as the `id` claim.
    fn id(&self) -> &str;
    /// Login and display name, carried as the `username` claim.
    fn username(&self) -> &str;
    /// Role name, carried as the `role` claim.
    fn role(&self) -> &str;
}
