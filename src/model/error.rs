use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl DatabaseError {
    fn database_error(&self) -> Option<&dyn sqlx::error::DatabaseError> {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) => Some(&**e),
            _ => None,
        }
    }

    /// Unique constraint hit, e.g. a second user with the same email.
    pub fn is_unique_violation(&self) -> bool {
        self.database_error()
            .is_some_and(|e| e.is_unique_violation())
    }

    /// The referenced parent row does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        self.database_error()
            .is_some_and(|e| e.is_foreign_key_violation())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SqlxError(sqlx::Error::RowNotFound))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Name of the violated constraint, when the database reported one.
    pub fn constraint(&self) -> Option<&str> {
        self.database_error().and_then(|e| e.constraint())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn row_not_found_is_classified() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
        assert!(!err.is_unique_violation());
        assert!(!err.is_foreign_key_violation());
        assert!(err.constraint().is_none());
    }

    #[test]
    fn validation_is_classified() {
        let err = DatabaseError::from(validator::ValidationErrors::new());
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }
}
