//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation. Regenerate
//! with `diesel print-schema` after changing migrations.

diesel::table! {
    /// User accounts table.
    ///
    /// `username` and `email` each carry a UNIQUE constraint; those
    /// constraints are the authoritative duplicate-registration guard.
    users (id) {
        /// Primary key: auto-incrementing surrogate id.
        id -> Int4,
        /// Unique account name (max 50 characters).
        #[max_length = 50]
        username -> Varchar,
        /// Unique email address (max 100 characters).
        #[max_length = 100]
        email -> Varchar,
        /// Opaque bcrypt credential hash.
        password_hash -> Varchar,
        /// Optional health profile, stored as JSONB.
        profile -> Nullable<Jsonb>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
