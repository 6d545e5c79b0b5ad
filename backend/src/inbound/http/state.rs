//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on the driving port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::WebhookCommand;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Webhook processing use-case.
    pub webhooks: Arc<dyn WebhookCommand>,
}

impl HttpState {
    /// Construct state around the webhook port.
    pub fn new(webhooks: Arc<dyn WebhookCommand>) -> Self {
        Self { webhooks }
    }
}
