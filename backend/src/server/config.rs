//! Layered server settings and the builder-style server configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use user_sync::domain::WebhookSecret;
use user_sync::outbound::identity_provider::ClerkMetadataClient;
use user_sync::outbound::persistence::DbPool;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_CLERK_API_URL: &str = "https://api.clerk.com/v1";

/// Settings loaded from CLI flags, `USER_SYNC_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SYNC")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it a logging fixture stands in
    /// for the database.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Apply embedded migrations before binding.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Base URL of the identity provider backend API.
    pub clerk_api_url: Option<String>,
    /// Timeout for metadata write-back requests.
    #[ortho_config(default = 10)]
    pub clerk_request_timeout_secs: u64,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Return the configured API base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a URL.
    pub fn clerk_api_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.clerk_api_url.as_deref().unwrap_or(DEFAULT_CLERK_API_URL))
    }

    /// Return the metadata request timeout.
    pub fn clerk_request_timeout(&self) -> Duration {
        Duration::from_secs(self.clerk_request_timeout_secs)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) webhook_secret: WebhookSecret,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) metadata_client: Option<Arc<ClerkMetadataClient>>,
}

impl ServerConfig {
    /// Construct a server configuration around the signing secret.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, webhook_secret: WebhookSecret) -> Self {
        Self {
            bind_addr,
            webhook_secret,
            db_pool: None,
            metadata_client: None,
        }
    }

    /// Attach a database connection pool so user projections are persisted.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the identity provider client used for metadata write-back.
    #[must_use]
    pub fn with_metadata_client(mut self, client: ClerkMetadataClient) -> Self {
        self.metadata_client = Some(Arc::new(client));
        self
    }
}
