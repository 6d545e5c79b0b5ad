//! Diesel table definitions for the user mirror.
//!
//! Keep in sync with `backend/migrations`.

diesel::table! {
    /// Users mirrored from the identity provider.
    users (id) {
        /// Internal identifier generated by PostgreSQL.
        id -> Uuid,
        /// Identity-provider user id; unique.
        clerk_id -> Varchar,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Avatar URL.
        photo -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
