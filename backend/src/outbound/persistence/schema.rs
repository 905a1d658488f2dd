//! Diesel table definitions. Must match `backend/migrations` exactly.

diesel::table! {
    /// Accounts. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        /// bcrypt hash including cost and salt.
        password_hash -> Text,
        address -> Text,
        role -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
