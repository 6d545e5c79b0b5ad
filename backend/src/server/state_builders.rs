//! Builders selecting adapters for the webhook use-case.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use user_sync::domain::UserSyncService;
use user_sync::domain::ports::{
    FixtureIdentityMetadataStore, FixtureUserSyncRepository, IdentityMetadataStore,
    UserSyncRepository,
};
use user_sync::inbound::http::state::HttpState;
use user_sync::outbound::identity_provider::ClerkMetadataClient;
use user_sync::outbound::persistence::DieselUserSyncRepository;
use user_sync::outbound::signature::SvixWebhookVerifier;

use super::ServerConfig;

fn build_repository(config: &ServerConfig) -> Arc<dyn UserSyncRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselUserSyncRepository::new(pool.clone())),
        None => Arc::new(FixtureUserSyncRepository),
    }
}

/// Provider client used for write-back, if any.
///
/// Write-back requires persistence: without a pool the fixture repository
/// invents internal ids that must never reach the provider.
pub(super) fn metadata_client(config: &ServerConfig) -> Option<Arc<ClerkMetadataClient>> {
    match (&config.db_pool, &config.metadata_client) {
        (Some(_), Some(client)) => Some(client.clone()),
        (None, Some(_)) => {
            warn!("metadata write-back disabled; it requires a configured database");
            None
        }
        (_, None) => None,
    }
}

fn build_metadata_store(config: &ServerConfig) -> Arc<dyn IdentityMetadataStore> {
    match metadata_client(config) {
        Some(client) => client,
        None => Arc::new(FixtureIdentityMetadataStore),
    }
}

/// Build HTTP state using real adapters where configured, otherwise the
/// logging fixtures.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let verifier = Arc::new(SvixWebhookVerifier::new(Arc::new(DefaultClock)));
    let service = UserSyncService::new(
        verifier,
        build_repository(config),
        build_metadata_store(config),
        config.webhook_secret.clone(),
    );
    web::Data::new(HttpState::new(Arc::new(service)))
}
