//! Identity-provider backend API adapter.

mod dto;
mod http_client;

pub use http_client::{ClerkMetadataClient, ClerkMetadataClientError};
