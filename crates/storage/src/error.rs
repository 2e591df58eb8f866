use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    /// A unique constraint rejected the write. Carries the constraint name
    /// so callers can tell which business rule was violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Map unique-key violations (Postgres 23505) to `ConstraintViolation`
    /// carrying the offending constraint's name; pass everything else through.
    pub fn from_db(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = error {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StorageError::ConstraintViolation(constraint);
            }
        }
        StorageError::from(error)
    }

    pub fn violated_constraint(&self) -> Option<&str> {
        match self {
            StorageError::ConstraintViolation(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23503")
        )
    }
}
