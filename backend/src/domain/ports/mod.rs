//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (database, identity provider, signature scheme). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_metadata_store;
mod user_sync_repository;
mod webhook_command;
mod webhook_verifier;

#[cfg(test)]
pub use identity_metadata_store::MockIdentityMetadataStore;
pub use identity_metadata_store::{
    FixtureIdentityMetadataStore, IdentityMetadataError, IdentityMetadataStore,
};
#[cfg(test)]
pub use user_sync_repository::MockUserSyncRepository;
pub use user_sync_repository::{
    FixtureUserSyncRepository, UserSyncRepository, UserSyncRepositoryError,
};
#[cfg(test)]
pub use webhook_command::MockWebhookCommand;
pub use webhook_command::{SyncOutcome, SyncStatus, WebhookCommand};
#[cfg(test)]
pub use webhook_verifier::MockWebhookVerifier;
pub use webhook_verifier::{WebhookVerificationError, WebhookVerifier};
