//! Internal Diesel row structs for the users table.
//!
//! These types never leave the persistence layer; repositories convert them to
//! domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub clerk_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
    #[expect(dead_code, reason = "audit column read with the row but not surfaced")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column read with the row but not surfaced")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for mirrored users. The id is generated by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub clerk_id: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub photo: &'a str,
}

/// Changeset applied on upsert conflicts; mirrors every provider-owned column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserReplaceChangeset<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub photo: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for profile updates; email and provider id stay untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub photo: &'a str,
    pub updated_at: DateTime<Utc>,
}
