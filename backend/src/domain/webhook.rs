//! Webhook delivery credentials: the shared signing secret and the three
//! signature headers that accompany every delivery.
//!
//! Keep header parsing outside the domain by exposing constructors that
//! validate raw string inputs before a handler talks to a port or service.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use zeroize::Zeroizing;

/// Header carrying the unique delivery identifier.
pub const SVIX_ID_HEADER: &str = "svix-id";
/// Header carrying the delivery timestamp in Unix seconds.
pub const SVIX_TIMESTAMP_HEADER: &str = "svix-timestamp";
/// Header carrying the space-separated signature list.
pub const SVIX_SIGNATURE_HEADER: &str = "svix-signature";

const SECRET_PREFIX: &str = "whsec_";

/// Errors raised while decoding the configured signing secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookSecretError {
    /// The secret was empty once the prefix was removed.
    #[error("webhook secret must not be empty")]
    Empty,
    /// The secret body was not valid base64.
    #[error("webhook secret is not valid base64: {message}")]
    InvalidEncoding { message: String },
}

/// Shared HMAC key used to verify deliveries.
///
/// Constructed from the provider's `whsec_<base64>` representation; the prefix
/// is optional. Key bytes are wiped on drop and never printed.
///
/// # Examples
/// ```
/// use user_sync::domain::WebhookSecret;
///
/// let secret = WebhookSecret::from_encoded("whsec_c2VjcmV0").expect("valid secret");
/// assert_eq!(secret.key(), b"secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret {
    key: Zeroizing<Vec<u8>>,
}

impl WebhookSecret {
    /// Decode a provider-formatted secret.
    pub fn from_encoded(raw: &str) -> Result<Self, WebhookSecretError> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix(SECRET_PREFIX).unwrap_or(trimmed);
        if body.is_empty() {
            return Err(WebhookSecretError::Empty);
        }
        let key = STANDARD
            .decode(body)
            .map_err(|err| WebhookSecretError::InvalidEncoding {
                message: err.to_string(),
            })?;
        if key.is_empty() {
            return Err(WebhookSecretError::Empty);
        }
        Ok(Self {
            key: Zeroizing::new(key),
        })
    }

    /// Wrap raw key bytes.
    #[must_use]
    pub fn from_bytes(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Zeroizing::new(key.into()),
        }
    }

    /// HMAC key bytes.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.key.as_slice()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// Raised when a delivery lacks one of the signature headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing required header `{header}`")]
pub struct MissingSignatureHeader {
    /// Name of the first missing header.
    pub header: &'static str,
}

/// The three headers a signed delivery must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    id: String,
    timestamp: String,
    signature: String,
}

impl SignatureHeaders {
    /// Build headers from raw values, reporting the first missing or blank one.
    ///
    /// # Examples
    /// ```
    /// use user_sync::domain::SignatureHeaders;
    ///
    /// let err = SignatureHeaders::try_from_parts(Some("msg_1"), None, Some("v1,abc"))
    ///     .expect_err("timestamp missing");
    /// assert_eq!(err.header, "svix-timestamp");
    /// ```
    pub fn try_from_parts(
        id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
    ) -> Result<Self, MissingSignatureHeader> {
        Ok(Self {
            id: require(id, SVIX_ID_HEADER)?,
            timestamp: require(timestamp, SVIX_TIMESTAMP_HEADER)?,
            signature: require(signature, SVIX_SIGNATURE_HEADER)?,
        })
    }

    /// Build headers by looking each name up through `lookup`.
    pub fn from_lookup<'a, F>(lookup: F) -> Result<Self, MissingSignatureHeader>
    where
        F: Fn(&'static str) -> Option<&'a str>,
    {
        Self::try_from_parts(
            lookup(SVIX_ID_HEADER),
            lookup(SVIX_TIMESTAMP_HEADER),
            lookup(SVIX_SIGNATURE_HEADER),
        )
    }

    /// Delivery identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Delivery timestamp as sent.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        self.timestamp.as_str()
    }

    /// Signature list as sent.
    #[must_use]
    pub fn signature(&self) -> &str {
        self.signature.as_str()
    }
}

fn require(value: Option<&str>, header: &'static str) -> Result<String, MissingSignatureHeader> {
    match value {
        Some(found) if !found.trim().is_empty() => Ok(found.to_owned()),
        _ => Err(MissingSignatureHeader { header }),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("whsec_c2VjcmV0")]
    #[case("c2VjcmV0")]
    #[case("  whsec_c2VjcmV0\n")]
    fn secret_decodes_with_or_without_prefix(#[case] raw: &str) {
        let secret = WebhookSecret::from_encoded(raw).expect("valid secret");
        assert_eq!(secret.key(), b"secret");
    }

    #[rstest]
    #[case("", WebhookSecretError::Empty)]
    #[case("whsec_", WebhookSecretError::Empty)]
    fn secret_rejects_empty_values(#[case] raw: &str, #[case] expected: WebhookSecretError) {
        assert_eq!(WebhookSecret::from_encoded(raw), Err(expected));
    }

    #[rstest]
    fn secret_rejects_invalid_base64() {
        let err = WebhookSecret::from_encoded("whsec_***").expect_err("invalid base64");
        assert!(matches!(err, WebhookSecretError::InvalidEncoding { .. }));
    }

    #[rstest]
    fn secret_debug_is_redacted() {
        let secret = WebhookSecret::from_bytes(b"top-secret".to_vec());
        assert_eq!(format!("{secret:?}"), "WebhookSecret(<redacted>)");
    }

    #[rstest]
    #[case(None, Some("1"), Some("v1,x"), SVIX_ID_HEADER)]
    #[case(Some("msg"), None, Some("v1,x"), SVIX_TIMESTAMP_HEADER)]
    #[case(Some("msg"), Some("1"), None, SVIX_SIGNATURE_HEADER)]
    #[case(Some(" "), Some("1"), Some("v1,x"), SVIX_ID_HEADER)]
    #[case(None, None, None, SVIX_ID_HEADER)]
    fn headers_report_first_missing(
        #[case] id: Option<&str>,
        #[case] timestamp: Option<&str>,
        #[case] signature: Option<&str>,
        #[case] expected: &str,
    ) {
        let err = SignatureHeaders::try_from_parts(id, timestamp, signature)
            .expect_err("incomplete headers must fail");
        assert_eq!(err.header, expected);
    }

    #[rstest]
    fn headers_accept_complete_set() {
        let headers = SignatureHeaders::from_lookup(|name| match name {
            SVIX_ID_HEADER => Some("msg_1"),
            SVIX_TIMESTAMP_HEADER => Some("1700000000"),
            SVIX_SIGNATURE_HEADER => Some("v1,abc"),
            _ => None,
        })
        .expect("complete headers");
        assert_eq!(headers.id(), "msg_1");
        assert_eq!(headers.timestamp(), "1700000000");
        assert_eq!(headers.signature(), "v1,abc");
    }

    #[rstest]
    fn headers_keep_values_as_sent() {
        let headers = SignatureHeaders::from_lookup(|name| match name {
            SVIX_ID_HEADER => Some(" msg_1 "),
            SVIX_TIMESTAMP_HEADER => Some("1700000000"),
            SVIX_SIGNATURE_HEADER => Some("v1,abc "),
            _ => None,
        })
        .expect("complete headers");
        assert_eq!(headers.id(), " msg_1 ");
        assert_eq!(headers.signature(), "v1,abc ");
    }
}
