//! Service entry-point: loads settings and secrets, prepares persistence and
//! serves the webhook receiver.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, create_server};
use user_sync::inbound::http::health::HealthState;
use user_sync::inbound::http::webhook_config::{WebhookSettings, webhook_settings_from_env};
use user_sync::outbound::identity_provider::ClerkMetadataClient;
use user_sync::outbound::persistence::{DbPool, PoolConfig, apply_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load server settings: {err}"))?;
    let webhooks =
        webhook_settings_from_env(&DefaultEnv::new()).wrap_err("invalid webhook configuration")?;

    let config = build_server_config(&settings, webhooks).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    info!("user sync webhook receiver listening");
    server.await.wrap_err("HTTP server terminated with an error")
}

async fn build_server_config(
    settings: &ServerSettings,
    webhooks: WebhookSettings,
) -> Result<ServerConfig> {
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    let mut config = ServerConfig::new(bind_addr, webhooks.secret);

    match settings.database_url.as_deref() {
        Some(database_url) => {
            if settings.run_migrations {
                let applied = apply_migrations(database_url.to_owned())
                    .await
                    .wrap_err("failed to apply database migrations")?;
                info!(applied, "database migrations applied");
            }
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
            )
            .await
            .wrap_err("failed to create database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("database url not set; user events are logged but not persisted"),
    }

    if let Some(secret_key) = webhooks.api_secret_key.as_deref() {
        let api_base = settings
            .clerk_api_url()
            .wrap_err("invalid identity provider API url")?;
        let client =
            ClerkMetadataClient::new(api_base, secret_key, settings.clerk_request_timeout())
                .wrap_err("failed to build identity provider client")?;
        config = config.with_metadata_client(client);
    }

    Ok(config)
}
