//! Diesel error classification shared by the storefront repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// `first()` found no row.
    NotFound,
    /// Anything else.
    Query(String),
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(crate) fn classify(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::NotFound,
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        _ => DieselFailure::Query("database error".to_owned()),
    }
}

/// Map a classified failure onto a repository error with only
/// connection and query variants.
pub(crate) fn map_basic<E>(
    failure: DieselFailure,
    connection: impl FnOnce(String) -> E,
    query: impl FnOnce(String) -> E,
) -> E {
    match failure {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::NotFound => query("record not found".to_owned()),
        DieselFailure::UniqueViolation { .. } => query("unique constraint violated".to_owned()),
        DieselFailure::ForeignKeyViolation { .. } => {
            query("foreign key constraint violated".to_owned())
        }
        DieselFailure::Query(message) => query(message),
    }
}
