//! Shared Diesel error mapping for read-only repositories.

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

/// Map Diesel errors into query, decode or connection constructors.
///
/// Row deserialisation failures (unparseable timestamps, wrong column types)
/// are data-integrity problems and go to `decode`; a closed or unopenable
/// database goes to `connection`; everything else is a query failure.
pub fn map_basic_diesel_error<E, Q, D, C>(
    error: diesel::result::Error,
    query: Q,
    decode: D,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    D: Fn(String) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DeserializationError(err) => decode(err.to_string()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, info) if is_unavailable(info.message()) => {
            connection("database unavailable")
        }
        _ => query("database error"),
    }
}

/// SQLite reports lock contention and unopenable files as generic errors.
fn is_unavailable(message: &str) -> bool {
    message.contains("database is locked") || message.contains("unable to open database")
}
