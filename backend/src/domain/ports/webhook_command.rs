//! Driving port for processing identity-provider webhook deliveries.
//!
//! Inbound adapters hand over the raw body and the signature headers; the
//! implementation verifies, dispatches on the event tag, and reports what it
//! did. Handler tests substitute a double for the whole pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, SignatureHeaders};

/// Whether the delivery changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// A user lifecycle event was applied.
    Processed,
    /// The event type is not handled; nothing was done.
    Ignored,
}

/// Result of handling one delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    /// Processing status.
    pub status: SyncStatus,
    /// Event tag from the envelope.
    #[schema(example = "user.created")]
    pub event_type: String,
    /// Human-readable summary.
    #[schema(example = "user created")]
    pub message: String,
    /// Internal id of the affected user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl SyncOutcome {
    /// Outcome for an applied user event.
    pub fn processed(
        event_type: impl Into<String>,
        message: impl Into<String>,
        user_id: Option<Uuid>,
    ) -> Self {
        Self {
            status: SyncStatus::Processed,
            event_type: event_type.into(),
            message: message.into(),
            user_id,
        }
    }

    /// Outcome for an event type nobody handles.
    pub fn ignored(event_type: impl Into<String>) -> Self {
        Self {
            status: SyncStatus::Ignored,
            event_type: event_type.into(),
            message: "event type not handled".to_owned(),
            user_id: None,
        }
    }
}

/// Domain use-case port for webhook deliveries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookCommand: Send + Sync {
    /// Verify and apply one delivery.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::domain::ErrorCode::InvalidRequest`] error for
    /// unverifiable deliveries or events without a user id, and an
    /// [`crate::domain::ErrorCode::InternalError`] error when a collaborator
    /// fails.
    async fn handle(&self, payload: &[u8], headers: &SignatureHeaders)
    -> Result<SyncOutcome, Error>;
}
