//! Webhook secret configuration parsing and validation.
//!
//! Secrets come from the environment rather than the layered settings file so
//! they never land in configuration dumps. The signing secret is mandatory;
//! its absence stops startup before the listener binds.

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{WebhookSecret, WebhookSecretError};

/// Environment variable holding the `whsec_` signing secret.
pub const WEBHOOK_SECRET_ENV: &str = "CLERK_WEBHOOK_SECRET";
/// Environment variable holding the provider backend API key.
pub const SECRET_KEY_ENV: &str = "CLERK_SECRET_KEY";

/// Secrets needed to receive and act on deliveries.
pub struct WebhookSettings {
    /// Shared secret used to verify delivery signatures.
    pub secret: WebhookSecret,
    /// Backend API key for metadata write-back, when configured.
    pub api_secret_key: Option<Zeroizing<String>>,
}

/// Errors raised while validating webhook configuration.
#[derive(thiserror::Error, Debug)]
pub enum WebhookConfigError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// The signing secret is present but cannot be decoded.
    #[error("invalid value for {name}: {source}")]
    InvalidSecret {
        name: &'static str,
        #[source]
        source: WebhookSecretError,
    },
}

/// Build webhook settings from environment variables.
///
/// # Examples
///
/// ```rust
/// use user_sync::inbound::http::webhook_config::webhook_settings_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "CLERK_WEBHOOK_SECRET" => Some("whsec_c2VjcmV0".to_owned()),
///     _ => None,
/// });
///
/// let settings = webhook_settings_from_env(&env).expect("secret configured");
/// assert_eq!(settings.secret.key(), b"secret");
/// assert!(settings.api_secret_key.is_none());
/// ```
pub fn webhook_settings_from_env<E: Env>(env: &E) -> Result<WebhookSettings, WebhookConfigError> {
    let raw_secret = Zeroizing::new(non_blank(env, WEBHOOK_SECRET_ENV).ok_or(
        WebhookConfigError::MissingEnv {
            name: WEBHOOK_SECRET_ENV,
        },
    )?);
    let secret = WebhookSecret::from_encoded(raw_secret.as_str()).map_err(|source| {
        WebhookConfigError::InvalidSecret {
            name: WEBHOOK_SECRET_ENV,
            source,
        }
    })?;

    let api_secret_key = non_blank(env, SECRET_KEY_ENV).map(Zeroizing::new);
    if api_secret_key.is_none() {
        warn!(
            name = SECRET_KEY_ENV,
            "identity provider API key not set; metadata write-back disabled"
        );
    }

    Ok(WebhookSettings {
        secret,
        api_secret_key,
    })
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}
