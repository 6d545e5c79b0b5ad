//! OpenAPI documentation configuration.
//!
//! Registers the webhook receiver and health probes together with the
//! payload schemas they return. The document backs Swagger UI in debug builds
//! and the `openapi-dump` binary.

use utoipa::OpenApi;

use crate::domain::ports::{SyncOutcome, SyncStatus};
use crate::domain::{Error, ErrorCode};

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User sync webhook receiver",
        description = "Receives signed identity-provider user events and mirrors them into PostgreSQL."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::webhooks::receive_clerk_webhook,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode, SyncOutcome, SyncStatus)),
    tags(
        (name = "webhooks", description = "Identity provider event delivery"),
        (name = "health", description = "Orchestrator probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn document_lists_webhook_and_probe_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/v1/webhooks/clerk", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }

    #[rstest]
    fn document_registers_payload_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;
        for name in ["Error", "ErrorCode", "SyncOutcome", "SyncStatus"] {
            assert!(schemas.contains_key(name), "{name} missing");
        }
    }
}
