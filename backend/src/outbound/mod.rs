//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL user mirror via Diesel
//! - **identity_provider**: provider backend API for metadata write-back
//! - **signature**: Svix HMAC verification of deliveries
//!
//! Adapters translate between domain types and infrastructure-specific
//! representations. They contain no business logic.

pub mod identity_provider;
pub mod persistence;
pub mod signature;
