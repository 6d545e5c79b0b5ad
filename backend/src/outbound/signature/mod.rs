//! Webhook signature verification adapters.

mod svix_verifier;

pub use svix_verifier::{SIGNATURE_TOLERANCE_SECS, SvixWebhookVerifier, sign_payload};
