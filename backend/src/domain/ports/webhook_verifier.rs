//! Port for authenticating webhook deliveries.
//!
//! Verification is kept behind a narrow trait so the sync service can be
//! exercised with a fake that accepts or rejects without real signatures.

use async_trait::async_trait;

use crate::domain::{SignatureHeaders, WebhookEnvelope, WebhookSecret};

use super::define_port_error;

define_port_error! {
    /// Reasons a delivery fails verification.
    pub enum WebhookVerificationError {
        /// Timestamp header is not an integer number of seconds.
        InvalidTimestamp { value: String } => "webhook timestamp is not valid: {value}",
        /// Timestamp lies outside the accepted window.
        TimestampOutOfTolerance { skew_secs: i64 } =>
            "webhook timestamp is outside the tolerance window ({skew_secs}s)",
        /// No `v1` signature matched the computed digest.
        SignatureMismatch => "no matching webhook signature",
        /// Payload is authentic but not a valid event envelope.
        InvalidPayload { message: String } => "webhook payload is not a valid event: {message}",
    }
}

impl WebhookVerificationError {
    /// Stable code reported in error details.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidTimestamp { .. } | Self::TimestampOutOfTolerance { .. } => {
                "invalid_timestamp"
            }
            Self::SignatureMismatch => "invalid_signature",
            Self::InvalidPayload { .. } => "invalid_payload",
        }
    }
}

/// Authenticates a raw delivery body and parses its envelope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookVerifier: Send + Sync {
    /// Verify `payload` against `headers` with `secret`.
    async fn verify(
        &self,
        payload: &[u8],
        headers: &SignatureHeaders,
        secret: &WebhookSecret,
    ) -> Result<WebhookEnvelope, WebhookVerificationError>;
}
