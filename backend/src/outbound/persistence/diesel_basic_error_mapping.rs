//! Diesel and pool error mapping shared by repositories whose port errors
//! expose `Query` and `Connection` constructors.
//!
//! Driver messages are logged at debug level only; port errors carry a short
//! category so nothing from the database leaks into HTTP responses.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn category(error: &DieselError) -> (&'static str, bool) {
    match error {
        DieselError::NotFound => ("record not found", false),
        DieselError::QueryBuilderError(_) => ("database query error", false),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ("database connection error", true)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ("unique constraint violated", false)
        }
        _ => ("database error", false),
    }
}

/// Map Diesel errors onto query/connection constructors.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    let (message, is_connection) = category(&error);
    if is_connection {
        connection(message)
    } else {
        query(message)
    }
}
