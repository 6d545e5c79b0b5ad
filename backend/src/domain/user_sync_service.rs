//! Webhook-driven user synchronisation.
//!
//! Implements the [`WebhookCommand`] driving port: authenticate the delivery,
//! dispatch on its tag, and forward projections to the repository. After a
//! create that yields a record, the internal id is written back to the
//! identity provider. Calls run sequentially and nothing is rolled back.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    IdentityMetadataError, IdentityMetadataStore, SyncOutcome, UserSyncRepository,
    UserSyncRepositoryError, WebhookCommand, WebhookVerificationError, WebhookVerifier,
};
use crate::domain::{
    Error, ExternalUserId, IdentityEvent, SignatureHeaders, UserEventData, UserValidationError,
    WebhookSecret,
};

/// User sync service implementing the webhook driving port.
pub struct UserSyncService<V: ?Sized, R: ?Sized, M: ?Sized> {
    verifier: Arc<V>,
    repository: Arc<R>,
    metadata: Arc<M>,
    secret: WebhookSecret,
}

impl<V: ?Sized, R: ?Sized, M: ?Sized> UserSyncService<V, R, M> {
    /// Create a service around its collaborators and the signing secret.
    pub fn new(
        verifier: Arc<V>,
        repository: Arc<R>,
        metadata: Arc<M>,
        secret: WebhookSecret,
    ) -> Self {
        Self {
            verifier,
            repository,
            metadata,
            secret,
        }
    }
}

impl<V, R, M> UserSyncService<V, R, M>
where
    V: WebhookVerifier + ?Sized,
    R: UserSyncRepository + ?Sized,
    M: IdentityMetadataStore + ?Sized,
{
    fn map_verification_error(err: &WebhookVerificationError) -> Error {
        warn!(error = %err, "webhook verification failed");
        Error::invalid_request("webhook verification failed").with_details(json!({
            "code": err.code(),
        }))
    }

    fn map_invalid_event(err: &serde_json::Error) -> Error {
        warn!(error = %err, "verified webhook carried malformed user data");
        Error::invalid_request("webhook payload is not a valid event").with_details(json!({
            "code": "invalid_payload",
        }))
    }

    fn missing_user_id(event_type: &str, err: UserValidationError) -> Error {
        warn!(event_type, error = %err, "webhook event has no user id");
        Error::invalid_request("event data is missing the user id").with_details(json!({
            "code": "missing_user_id",
            "eventType": event_type,
        }))
    }

    fn map_repository_error(
        err: &UserSyncRepositoryError,
        event_type: &str,
        external_id: &ExternalUserId,
    ) -> Error {
        error!(event_type, %external_id, error = %err, "user sync repository failed");
        Error::internal(format!("user sync repository error: {err}"))
    }

    fn map_metadata_error(
        err: &IdentityMetadataError,
        event_type: &str,
        external_id: &ExternalUserId,
        internal_id: uuid::Uuid,
    ) -> Error {
        error!(
            event_type,
            %external_id,
            %internal_id,
            error = %err,
            "user stored but identity provider metadata update failed"
        );
        Error::internal(format!("identity metadata update failed: {err}"))
    }

    async fn user_created(&self, event_type: &str, data: UserEventData) -> Result<SyncOutcome, Error> {
        let projection = data
            .into_new_user()
            .map_err(|err| Self::missing_user_id(event_type, err))?;
        let external_id = projection.external_id.clone();

        let created = self
            .repository
            .create(&projection)
            .await
            .map_err(|err| Self::map_repository_error(&err, event_type, &external_id))?;

        let Some(record) = created else {
            info!(event_type, %external_id, "repository returned no record; metadata not written");
            return Ok(SyncOutcome::processed(event_type, "user created", None));
        };

        self.metadata
            .set_internal_id(&external_id, record.internal_id)
            .await
            .map_err(|err| {
                Self::map_metadata_error(&err, event_type, &external_id, record.internal_id)
            })?;

        info!(event_type, %external_id, internal_id = %record.internal_id, "user created");
        Ok(SyncOutcome::processed(
            event_type,
            "user created",
            Some(record.internal_id),
        ))
    }

    async fn user_updated(&self, event_type: &str, data: UserEventData) -> Result<SyncOutcome, Error> {
        let (external_id, update) = data
            .into_profile_update()
            .map_err(|err| Self::missing_user_id(event_type, err))?;

        let record = self
            .repository
            .update(&external_id, &update)
            .await
            .map_err(|err| Self::map_repository_error(&err, event_type, &external_id))?;

        info!(event_type, %external_id, "user updated");
        Ok(SyncOutcome::processed(
            event_type,
            "user updated",
            Some(record.internal_id),
        ))
    }

    async fn user_deleted(&self, event_type: &str, data: &UserEventData) -> Result<SyncOutcome, Error> {
        let external_id = data
            .external_id()
            .map_err(|err| Self::missing_user_id(event_type, err))?;

        let record = self
            .repository
            .delete(&external_id)
            .await
            .map_err(|err| Self::map_repository_error(&err, event_type, &external_id))?;

        info!(event_type, %external_id, "user deleted");
        Ok(SyncOutcome::processed(
            event_type,
            "user deleted",
            Some(record.internal_id),
        ))
    }
}

#[async_trait]
impl<V, R, M> WebhookCommand for UserSyncService<V, R, M>
where
    V: WebhookVerifier + ?Sized,
    R: UserSyncRepository + ?Sized,
    M: IdentityMetadataStore + ?Sized,
{
    async fn handle(
        &self,
        payload: &[u8],
        headers: &SignatureHeaders,
    ) -> Result<SyncOutcome, Error> {
        let envelope = self
            .verifier
            .verify(payload, headers, &self.secret)
            .await
            .map_err(|err| Self::map_verification_error(&err))?;

        let event = IdentityEvent::try_from(envelope).map_err(|err| Self::map_invalid_event(&err))?;
        let event_type = event.event_type().to_owned();

        match event {
            IdentityEvent::UserCreated(data) => self.user_created(&event_type, data).await,
            IdentityEvent::UserUpdated(data) => self.user_updated(&event_type, data).await,
            IdentityEvent::UserDeleted(data) => self.user_deleted(&event_type, &data).await,
            IdentityEvent::Unhandled(_) => {
                info!(event_type, "webhook event type not handled");
                Ok(SyncOutcome::ignored(event_type))
            }
        }
    }
}

#[cfg(test)]
#[path = "user_sync_service_tests.rs"]
mod tests;
