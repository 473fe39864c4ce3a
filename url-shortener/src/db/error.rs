#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("alias not found")]
    AliasNotFound,
    #[error("alias already exists")]
    AliasExists,
    #[error("url not found")]
    UrlNotFound,
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<diesel::result::Error> for StorageError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StorageError::AliasExists
            }
            other => StorageError::Database(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for StorageError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StorageError::Pool(err.to_string())
    }
}
