use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Table {table} does not exist in database {database}")]
    UnknownTable { database: String, table: String },
    #[error("Connection blocked: {0}")]
    Blocked(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Exercise",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Exercise not found: abc-123");
    }

    #[test]
    fn test_repository_error_unknown_table_display() {
        let error = RepositoryError::UnknownTable {
            database: "trainlog".to_string(),
            table: "exercises".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Table exercises does not exist in database trainlog"
        );
    }

    #[test]
    fn test_repository_error_blocked_display() {
        let error = RepositoryError::Blocked("database is locked".to_string());
        assert_eq!(error.to_string(), "Connection blocked: database is locked");
    }

    #[test]
    fn test_repository_error_serialization_display() {
        let error = RepositoryError::Serialization("missing field `title`".to_string());
        assert_eq!(
            error.to_string(),
            "Serialization error: missing field `title`"
        );
    }
}
