//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed webhook and user projections, the error
//! taxonomy crossing into inbound adapters, and the user sync service that
//! drives the persistence and identity-provider ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - TraceId: request correlation identifier.
//! - WebhookSecret / SignatureHeaders: delivery credentials.
//! - WebhookEnvelope / IdentityEvent / UserEventData: parsed events.
//! - NewUserProjection / UserProfileUpdate / UserRecord: persistence shapes.
//! - UserSyncService: implementation of the webhook driving port.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_events;
pub mod user_sync_service;
pub mod webhook;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    ExternalUserId, NewUserProjection, UserProfileUpdate, UserRecord, UserValidationError,
};
pub use self::user_events::{
    EmailAddress, IdentityEvent, USER_CREATED, USER_DELETED, USER_UPDATED, UserEventData,
    WebhookEnvelope,
};
pub use self::user_sync_service::UserSyncService;
pub use self::webhook::{
    MissingSignatureHeader, SVIX_ID_HEADER, SVIX_SIGNATURE_HEADER, SVIX_TIMESTAMP_HEADER,
    SignatureHeaders, WebhookSecret, WebhookSecretError,
};
