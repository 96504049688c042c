//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `UnknownTable` -> 500 (Internal Server Error)
/// - `Blocked` -> 503 (Service Unavailable)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use trainlog_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::Blocked("upgrade in progress".to_string());
/// assert_eq!(repository_error_to_status_code(&error), 503);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::UnknownTable { .. } => 500,
        RepositoryError::Blocked(_) => 503,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Workout",
            id: "w-1".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_connection_errors_map_to_503() {
        let blocked = RepositoryError::Blocked("locked".to_string());
        let failed = RepositoryError::ConnectionFailed("disconnected".to_string());
        assert_eq!(repository_error_to_status_code(&blocked), 503);
        assert_eq!(repository_error_to_status_code(&failed), 503);
    }

    #[test]
    fn test_unknown_table_maps_to_500() {
        let error = RepositoryError::UnknownTable {
            database: "db".to_string(),
            table: "t".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("bad date".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }
}
