//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Local identities, whether registered directly or created by a
    /// provider login.
    ///
    /// `email` and `username` carry UNIQUE constraints
    /// (`identities_email_key`, `identities_username_key`); concurrent
    /// duplicate inserts are resolved by constraint violation, not by
    /// application locking. A NULL `password_hash` is the unusable-password
    /// sentinel for provider-created accounts.
    identities (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Reconciliation key; unique.
        email -> Varchar,
        /// Login handle; unique.
        username -> Varchar,
        /// Human-readable display name.
        display_name -> Varchar,
        /// Avatar image URL, when known.
        avatar_url -> Nullable<Varchar>,
        /// PHC-format argon2 hash, or NULL for social-only accounts.
        password_hash -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}
