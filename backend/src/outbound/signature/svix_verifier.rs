//! HMAC-SHA256 verifier for Svix-signed deliveries.
//!
//! The signed content is `"{svix-id}.{svix-timestamp}.{body}"`. The
//! `svix-signature` header holds space-separated `v1,<base64>` entries and any
//! one matching entry authenticates the delivery. Digests are compared in
//! constant time.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use mockable::Clock;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::domain::ports::{WebhookVerificationError, WebhookVerifier};
use crate::domain::{SignatureHeaders, WebhookEnvelope, WebhookSecret};

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed distance between the delivery timestamp and now.
pub const SIGNATURE_TOLERANCE_SECS: u64 = 300;

const SIGNATURE_VERSION: &str = "v1";

/// Verifier implementing the Svix signing scheme.
pub struct SvixWebhookVerifier {
    clock: Arc<dyn Clock + Send + Sync>,
}

impl SvixWebhookVerifier {
    /// Build a verifier that checks timestamps against `clock`.
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self { clock }
    }

    fn check_timestamp(&self, raw: &str) -> Result<(), WebhookVerificationError> {
        let sent: i64 = raw
            .parse()
            .map_err(|_| WebhookVerificationError::invalid_timestamp(raw))?;
        let skew = self.clock.utc().timestamp().saturating_sub(sent);
        if skew.unsigned_abs() > SIGNATURE_TOLERANCE_SECS {
            return Err(WebhookVerificationError::timestamp_out_of_tolerance(skew));
        }
        Ok(())
    }
}

/// Compute the base64 `v1` signature for a delivery.
///
/// # Examples
/// ```
/// use user_sync::domain::WebhookSecret;
/// use user_sync::outbound::signature::sign_payload;
///
/// let secret = WebhookSecret::from_bytes(b"key".to_vec());
/// let signature = sign_payload(&secret, "msg_1", "1700000000", b"{}");
/// assert_eq!(signature.len(), 44);
/// ```
#[must_use]
pub fn sign_payload(secret: &WebhookSecret, id: &str, timestamp: &str, payload: &[u8]) -> String {
    STANDARD.encode(digest(secret, id, timestamp, payload))
}

fn digest(secret: &WebhookSecret, id: &str, timestamp: &str, payload: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so construction cannot fail.
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.key()) else {
        return Vec::new();
    };
    mac.update(id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn any_signature_matches(expected: &[u8], header: &str) -> bool {
    let mut matched = false;
    for entry in header.split_whitespace() {
        let Some((version, encoded)) = entry.split_once(',') else {
            continue;
        };
        if version != SIGNATURE_VERSION {
            continue;
        }
        let Ok(candidate) = STANDARD.decode(encoded) else {
            continue;
        };
        matched |= bool::from(candidate.as_slice().ct_eq(expected));
    }
    matched
}

#[async_trait]
impl WebhookVerifier for SvixWebhookVerifier {
    async fn verify(
        &self,
        payload: &[u8],
        headers: &SignatureHeaders,
        secret: &WebhookSecret,
    ) -> Result<WebhookEnvelope, WebhookVerificationError> {
        self.check_timestamp(headers.timestamp())?;

        let expected = digest(secret, headers.id(), headers.timestamp(), payload);
        if expected.is_empty() || !any_signature_matches(&expected, headers.signature()) {
            return Err(WebhookVerificationError::signature_mismatch());
        }
        debug!(delivery_id = headers.id(), "webhook signature verified");

        serde_json::from_slice(payload)
            .map_err(|err| WebhookVerificationError::invalid_payload(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the Svix verifier.
    use super::*;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    const NOW: i64 = 1_700_000_000;
    const BODY: &[u8] = br#"{"type":"user.created","data":{"id":"u1"}}"#;

    struct FixtureClock {
        utc_now: DateTime<Utc>,
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc_now.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.utc_now
        }
    }

    #[fixture]
    fn verifier() -> SvixWebhookVerifier {
        let utc_now = Utc
            .timestamp_opt(NOW, 0)
            .single()
            .expect("valid fixture timestamp");
        SvixWebhookVerifier::new(Arc::new(FixtureClock { utc_now }))
    }

    #[fixture]
    fn secret() -> WebhookSecret {
        WebhookSecret::from_encoded("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw").expect("valid secret")
    }

    fn headers(timestamp: &str, signature: &str) -> SignatureHeaders {
        SignatureHeaders::try_from_parts(Some("msg_1"), Some(timestamp), Some(signature))
            .expect("complete headers")
    }

    fn signed(secret: &WebhookSecret, timestamp: &str, payload: &[u8]) -> String {
        format!("v1,{}", sign_payload(secret, "msg_1", timestamp, payload))
    }

    #[rstest]
    #[tokio::test]
    async fn accepts_correctly_signed_delivery(verifier: SvixWebhookVerifier, secret: WebhookSecret) {
        let ts = NOW.to_string();
        let envelope = verifier
            .verify(BODY, &headers(&ts, &signed(&secret, &ts, BODY)), &secret)
            .await
            .expect("valid delivery");
        assert_eq!(envelope.event_type, "user.created");
    }

    #[rstest]
    #[tokio::test]
    async fn accepts_any_matching_entry(verifier: SvixWebhookVerifier, secret: WebhookSecret) {
        let ts = NOW.to_string();
        let header = format!("v1,Zm9v v2,bogus {}", signed(&secret, &ts, BODY));
        let result = verifier.verify(BODY, &headers(&ts, &header), &secret).await;
        assert!(result.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_tampered_body(verifier: SvixWebhookVerifier, secret: WebhookSecret) {
        let ts = NOW.to_string();
        let header = signed(&secret, &ts, BODY);
        let tampered = br#"{"type":"user.deleted","data":{"id":"u1"}}"#;
        let err = verifier
            .verify(tampered, &headers(&ts, &header), &secret)
            .await
            .expect_err("tampered body");
        assert_eq!(err, WebhookVerificationError::signature_mismatch());
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_wrong_secret(verifier: SvixWebhookVerifier, secret: WebhookSecret) {
        let ts = NOW.to_string();
        let other = WebhookSecret::from_bytes(b"another-secret".to_vec());
        let header = signed(&other, &ts, BODY);
        let err = verifier
            .verify(BODY, &headers(&ts, &header), &secret)
            .await
            .expect_err("wrong secret");
        assert_eq!(err.code(), "invalid_signature");
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_unknown_signature_versions(
        verifier: SvixWebhookVerifier,
        secret: WebhookSecret,
    ) {
        let ts = NOW.to_string();
        let header = format!("v2,{}", sign_payload(&secret, "msg_1", &ts, BODY));
        let result = verifier.verify(BODY, &headers(&ts, &header), &secret).await;
        assert_eq!(result, Err(WebhookVerificationError::signature_mismatch()));
    }

    #[rstest]
    #[case(NOW - 301)]
    #[case(NOW + 301)]
    #[tokio::test]
    async fn rejects_timestamps_outside_tolerance(
        verifier: SvixWebhookVerifier,
        secret: WebhookSecret,
        #[case] sent: i64,
    ) {
        let ts = sent.to_string();
        let err = verifier
            .verify(BODY, &headers(&ts, &signed(&secret, &ts, BODY)), &secret)
            .await
            .expect_err("stale timestamp");
        assert!(matches!(
            err,
            WebhookVerificationError::TimestampOutOfTolerance { .. }
        ));
    }

    #[rstest]
    #[case(NOW - 300)]
    #[case(NOW + 300)]
    #[tokio::test]
    async fn accepts_timestamps_at_tolerance_edge(
        verifier: SvixWebhookVerifier,
        secret: WebhookSecret,
        #[case] sent: i64,
    ) {
        let ts = sent.to_string();
        let result = verifier
            .verify(BODY, &headers(&ts, &signed(&secret, &ts, BODY)), &secret)
            .await;
        assert!(result.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_non_numeric_timestamp(verifier: SvixWebhookVerifier, secret: WebhookSecret) {
        let err = verifier
            .verify(BODY, &headers("yesterday", "v1,abc"), &secret)
            .await
            .expect_err("bad timestamp");
        assert_eq!(err, WebhookVerificationError::invalid_timestamp("yesterday"));
    }

    #[rstest]
    #[tokio::test]
    async fn authentic_but_malformed_body_is_invalid_payload(
        verifier: SvixWebhookVerifier,
        secret: WebhookSecret,
    ) {
        let ts = NOW.to_string();
        let body = b"not json";
        let err = verifier
            .verify(body, &headers(&ts, &signed(&secret, &ts, body)), &secret)
            .await
            .expect_err("malformed body");
        assert_eq!(err.code(), "invalid_payload");
    }

    #[rstest]
    fn signature_is_deterministic(secret: WebhookSecret) {
        let first = sign_payload(&secret, "msg_1", "1", BODY);
        let second = sign_payload(&secret, "msg_1", "1", BODY);
        let other_id = sign_payload(&secret, "msg_2", "1", BODY);
        assert_eq!(first, second);
        assert_ne!(first, other_id);
    }
}
