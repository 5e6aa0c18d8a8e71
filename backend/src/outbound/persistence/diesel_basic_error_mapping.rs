//! Shared Diesel error mapping for repositories with connection/query errors.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool error through a repository's `connection` constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map a Diesel error through a repository's `query`/`connection`
/// constructors. Closed connections count as connection errors; everything
/// else is a query error with a stable message.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::ClaimRepositoryError;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let error = map_basic_pool_error(
            PoolError::checkout("connection refused"),
            ClaimRepositoryError::connection,
        );
        assert_eq!(error, ClaimRepositoryError::connection("connection refused"));
    }

    #[rstest]
    fn not_found_becomes_a_query_error() {
        let error = map_basic_diesel_error(
            diesel::result::Error::NotFound,
            ClaimRepositoryError::query,
            ClaimRepositoryError::connection,
        );
        assert_eq!(error, ClaimRepositoryError::query("record not found"));
    }

    #[rstest]
    fn rollback_failures_are_query_errors() {
        let error = map_basic_diesel_error(
            diesel::result::Error::RollbackTransaction,
            ClaimRepositoryError::query,
            ClaimRepositoryError::connection,
        );
        assert!(matches!(error, ClaimRepositoryError::Query { .. }));
    }
}
