//! User projections exchanged with the persistence port.
//!
//! The identity provider owns the user; this service only mirrors the
//! display fields it needs. Two projections exist: the full projection used
//! on creation and a narrower profile update that deliberately has no email
//! or external identifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors raised while building user projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The event carried no usable external user identifier.
    #[error("external user id must be present and non-empty")]
    MissingExternalId,
}

/// Identifier assigned to the user by the identity provider.
///
/// ## Invariants
/// - Non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use user_sync::domain::ExternalUserId;
///
/// let id = ExternalUserId::new("user_2abc").expect("valid id");
/// assert_eq!(id.as_str(), "user_2abc");
/// assert!(ExternalUserId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalUserId(String);

impl ExternalUserId {
    /// Validate and construct an [`ExternalUserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::MissingExternalId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ExternalUserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExternalUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ExternalUserId> for String {
    fn from(value: ExternalUserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ExternalUserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Projection persisted when the provider reports a new user.
///
/// Optional provider fields collapse to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserProjection {
    /// Provider-assigned identifier.
    #[serde(rename = "clerkId")]
    pub external_id: ExternalUserId,
    /// First listed email address.
    pub email: String,
    /// Provider username.
    pub username: String,
    /// Given name.
    #[serde(rename = "firstName")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Avatar URL.
    #[serde(rename = "photo")]
    pub photo_url: String,
}

/// Display fields rewritten when the provider reports a profile change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    /// Given name.
    #[serde(rename = "firstName")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Provider username.
    pub username: String,
    /// Avatar URL.
    #[serde(rename = "photo")]
    pub photo_url: String,
}

/// Stored user row as returned by the persistence port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Internal identifier generated by the database.
    pub internal_id: Uuid,
    /// Provider-assigned identifier.
    pub external_id: ExternalUserId,
    /// Email address.
    pub email: String,
    /// Provider username.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar URL.
    pub photo_url: String,
}
