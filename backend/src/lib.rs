//! User sync library modules.
//!
//! Receives signed identity-provider webhooks, verifies them and mirrors the
//! user lifecycle into PostgreSQL, writing the internal id back to the
//! provider after a create.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::{TRACE_ID_HEADER, TraceId};
pub use middleware::Trace;
