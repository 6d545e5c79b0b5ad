//! Identity-provider events carried by verified webhook deliveries.
//!
//! The envelope is `{ "type": <tag>, "data": <object> }`. Only the three user
//! lifecycle tags are dispatched; every other tag is accepted and ignored.

use serde::Deserialize;
use serde_json::Value;

use super::user::{ExternalUserId, NewUserProjection, UserProfileUpdate, UserValidationError};

/// Tag for newly registered users.
pub const USER_CREATED: &str = "user.created";
/// Tag for profile changes.
pub const USER_UPDATED: &str = "user.updated";
/// Tag for removed users.
pub const USER_DELETED: &str = "user.deleted";

/// Parsed delivery body. Extra top-level fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEnvelope {
    /// Event-type tag.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event payload; shape depends on the tag.
    #[serde(default)]
    pub data: Value,
}

/// One entry of the provider's `email_addresses` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
    /// The address itself.
    #[serde(default)]
    pub email_address: Option<String>,
}

/// User object as delivered by the provider. `null` and absent are alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserEventData {
    /// Provider-assigned identifier.
    pub id: Option<String>,
    /// Registered addresses, primary first.
    pub email_addresses: Option<Vec<EmailAddress>>,
    /// Username.
    pub username: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Avatar URL.
    pub image_url: Option<String>,
}

impl UserEventData {
    /// Validated provider identifier.
    pub fn external_id(&self) -> Result<ExternalUserId, UserValidationError> {
        ExternalUserId::new(self.id.clone().unwrap_or_default())
    }

    /// Project the event into the row created for a new user.
    ///
    /// # Examples
    /// ```
    /// use user_sync::domain::UserEventData;
    ///
    /// let data: UserEventData = serde_json::from_value(serde_json::json!({
    ///     "id": "u1",
    ///     "email_addresses": [{ "email_address": "a@b.com" }],
    /// }))
    /// .expect("valid data");
    /// let projection = data.into_new_user().expect("id present");
    /// assert_eq!(projection.email, "a@b.com");
    /// assert_eq!(projection.username, "");
    /// ```
    pub fn into_new_user(self) -> Result<NewUserProjection, UserValidationError> {
        let external_id = self.external_id()?;
        let email = self
            .email_addresses
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|entry| entry.email_address)
            .unwrap_or_default();
        Ok(NewUserProjection {
            external_id,
            email,
            username: self.username.unwrap_or_default(),
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            photo_url: self.image_url.unwrap_or_default(),
        })
    }

    /// Project the event into the display-field update for an existing user.
    pub fn into_profile_update(
        self,
    ) -> Result<(ExternalUserId, UserProfileUpdate), UserValidationError> {
        let external_id = self.external_id()?;
        Ok((
            external_id,
            UserProfileUpdate {
                first_name: self.first_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
                username: self.username.unwrap_or_default(),
                photo_url: self.image_url.unwrap_or_default(),
            },
        ))
    }
}

/// Event selected by the envelope's tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// `user.created`.
    UserCreated(UserEventData),
    /// `user.updated`.
    UserUpdated(UserEventData),
    /// `user.deleted`.
    UserDeleted(UserEventData),
    /// Any other tag; carries the tag for logging.
    Unhandled(String),
}

impl IdentityEvent {
    /// Tag this event was dispatched from.
    #[must_use]
    pub fn event_type(&self) -> &str {
        match self {
            Self::UserCreated(_) => USER_CREATED,
            Self::UserUpdated(_) => USER_UPDATED,
            Self::UserDeleted(_) => USER_DELETED,
            Self::Unhandled(tag) => tag.as_str(),
        }
    }
}

impl TryFrom<WebhookEnvelope> for IdentityEvent {
    type Error = serde_json::Error;

    fn try_from(envelope: WebhookEnvelope) -> Result<Self, Self::Error> {
        let WebhookEnvelope { event_type, data } = envelope;
        let parse = |data: Value| -> Result<UserEventData, serde_json::Error> {
            if data.is_null() {
                Ok(UserEventData::default())
            } else {
                serde_json::from_value(data)
            }
        };
        Ok(match event_type.as_str() {
            USER_CREATED => Self::UserCreated(parse(data)?),
            USER_UPDATED => Self::UserUpdated(parse(data)?),
            USER_DELETED => Self::UserDeleted(parse(data)?),
            _ => Self::Unhandled(event_type),
        })
    }
}
