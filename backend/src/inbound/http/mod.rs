//! HTTP inbound adapter exposing the webhook receiver and health probes.

pub mod error;
pub mod health;
pub mod state;
pub mod webhook_config;
pub mod webhooks;

pub use error::ApiResult;
