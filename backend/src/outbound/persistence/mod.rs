//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! records; schema and row structs stay private to this module. Connections
//! come from a `bb8` pool via `diesel-async`, while migrations run once on a
//! blocking connection at startup.

mod diesel_basic_error_mapping;
mod diesel_user_sync_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_sync_repository::DieselUserSyncRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_migrations, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
