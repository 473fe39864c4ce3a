use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Server message when `statement_timeout` cancels a statement.
const STATEMENT_TIMEOUT_MESSAGE: &str = "canceling statement due to statement timeout";

/// Failures of the user and session stores. The auth core re-classifies these.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Connection pool error: {0}")]
    PoolError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),
    #[error("Foreign key constraint violation: {0}")]
    ForeignKeyViolation(String),
    /// A conditional write found the row in a different state than expected.
    #[error("Conflicting update: {0}")]
    Conflict(String),
    #[error("Store deadline exceeded")]
    Timeout,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            DieselError::DatabaseError(_, info)
                if info.message().contains(STATEMENT_TIMEOUT_MESSAGE) =>
            {
                Self::Timeout
            }
            other => Self::DatabaseError(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::PoolError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err = RepositoryError::from(DieselError::NotFound);
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[test]
    fn rollback_is_a_generic_database_error() {
        let err = RepositoryError::from(DieselError::RollbackTransaction);
        assert!(matches!(err, RepositoryError::DatabaseError(_)));
    }

    #[test]
    fn cancelled_statement_maps_to_timeout() {
        let err = RepositoryError::from(DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new(STATEMENT_TIMEOUT_MESSAGE.to_string()),
        ));
        assert!(matches!(err, RepositoryError::Timeout));
    }

    #[test]
    fn timeout_has_stable_message() {
        assert_eq!(RepositoryError::Timeout.to_string(), "Store deadline exceeded");
    }
}
