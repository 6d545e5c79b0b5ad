//! Port for writing the internal user id back to the identity provider.
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ExternalUserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while updating provider-side user metadata.
    pub enum IdentityMetadataError {
        /// Request did not complete before the client timeout.
        Timeout { message: String } => "identity provider request timed out: {message}",
        /// Network or TLS failure.
        Transport { message: String } => "identity provider request failed: {message}",
        /// Provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "identity provider rejected metadata update ({status}): {message}",
    }
}

/// Provider-side metadata updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityMetadataStore: Send + Sync {
    /// Record `internal_id` in the public metadata of the provider's user.
    async fn set_internal_id(
        &self,
        external_id: &ExternalUserId,
        internal_id: Uuid,
    ) -> Result<(), IdentityMetadataError>;
}

/// Store used when no provider API key is configured. Logs and succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityMetadataStore;

#[async_trait]
impl IdentityMetadataStore for FixtureIdentityMetadataStore {
    async fn set_internal_id(
        &self,
        external_id: &ExternalUserId,
        internal_id: Uuid,
    ) -> Result<(), IdentityMetadataError> {
        debug!(%external_id, %internal_id, "fixture metadata store skipped provider update");
        Ok(())
    }
}
