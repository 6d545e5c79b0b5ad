//! Reqwest-backed identity metadata store.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, timeout and HTTP status mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::dto::MetadataPatchDto;
use crate::domain::ExternalUserId;
use crate::domain::ports::{IdentityMetadataError, IdentityMetadataStore};

/// Errors raised while constructing [`ClerkMetadataClient`].
#[derive(Debug, Error)]
pub enum ClerkMetadataClientError {
    /// The API base URL cannot carry path segments.
    #[error("identity provider API URL `{url}` cannot be used as a base")]
    InvalidBaseUrl { url: String },
    /// The secret key is blank.
    #[error("identity provider secret key must not be empty")]
    EmptySecretKey,
    /// The HTTP client could not be built.
    #[error("failed to build identity provider HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Metadata store that PATCHes the provider's backend API.
pub struct ClerkMetadataClient {
    client: Client,
    api_base: Url,
    secret_key: Zeroizing<String>,
}

impl ClerkMetadataClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error for an unusable base URL, a blank key, or when the
    /// reqwest client cannot be constructed.
    pub fn new(
        api_base: Url,
        secret_key: &str,
        timeout: Duration,
    ) -> Result<Self, ClerkMetadataClientError> {
        if api_base.cannot_be_a_base() {
            return Err(ClerkMetadataClientError::InvalidBaseUrl {
                url: api_base.to_string(),
            });
        }
        if secret_key.trim().is_empty() {
            return Err(ClerkMetadataClientError::EmptySecretKey);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base,
            secret_key: Zeroizing::new(secret_key.trim().to_owned()),
        })
    }
}

#[async_trait]
impl IdentityMetadataStore for ClerkMetadataClient {
    async fn set_internal_id(
        &self,
        external_id: &ExternalUserId,
        internal_id: Uuid,
    ) -> Result<(), IdentityMetadataError> {
        let url = metadata_url(&self.api_base, external_id)?;
        let response = self
            .client
            .patch(url)
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&MetadataPatchDto::for_internal_id(internal_id))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(%external_id, %internal_id, "identity provider metadata updated");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn metadata_url(base: &Url, external_id: &ExternalUserId) -> Result<Url, IdentityMetadataError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| IdentityMetadataError::transport(format!("invalid API base URL {base}")))?
        .pop_if_empty()
        .extend(["users", external_id.as_str(), "metadata"]);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> IdentityMetadataError {
    if error.is_timeout() {
        IdentityMetadataError::timeout(error.to_string())
    } else {
        IdentityMetadataError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityMetadataError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityMetadataError::timeout(message)
        }
        _ => IdentityMetadataError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
