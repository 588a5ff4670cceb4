//! Database error type

/// Errors surfaced by the pool and repositories
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No connection became available within the acquisition timeout
    #[error("timeout exceeded when trying to connect")]
    AcquireTimeout,

    /// The pool is shutting down or already closed
    #[error("connection pool is closed")]
    PoolClosed,

    /// The statement failed or the connection broke
    #[error("{0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::AcquireTimeout,
            sqlx::Error::PoolClosed => Self::PoolClosed,
            other => Self::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_their_kinds() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::AcquireTimeout
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::PoolClosed
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Query(_)
        ));
    }

    #[test]
    fn query_error_message_is_passed_through() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), sqlx::Error::RowNotFound.to_string());
    }
}
