//! Error types for search operations

use crate::error::AppError;
use crate::models::EntityType;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// No caller identity was supplied
    #[error("Not authenticated")]
    Unauthenticated,

    /// The caller identity does not resolve to a user record
    #[error("User not found")]
    UserNotFound,

    /// Sort field not supported for the entity type
    #[error("Cannot sort {entity} results by '{field}'")]
    InvalidSort { field: String, entity: EntityType },

    /// Malformed request input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Document store read failed
    #[error("Store read failed: {0}")]
    StoreFailed(String),

    /// Document store read exceeded its deadline
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<AppError> for SearchError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Timeout(operation) => SearchError::Timeout {
                operation,
                timeout_ms: 0,
            },
            other => SearchError::StoreFailed(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for SearchError {
    fn from(err: validator::ValidationErrors) -> Self {
        SearchError::InvalidRequest(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Unauthenticated => AppError::Authentication(err.to_string()),
            SearchError::UserNotFound => AppError::Authorization(err.to_string()),
            SearchError::InvalidSort { .. } | SearchError::InvalidRequest(_) => {
                AppError::Validation(err.to_string())
            }
            SearchError::StoreFailed(msg) => AppError::Database(msg),
            SearchError::Timeout { .. } => AppError::Timeout(err.to_string()),
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_auth_failures_map_to_fixed_messages() {
        let unauthenticated = AppError::from(SearchError::Unauthenticated);
        assert_eq!(unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            unauthenticated.to_string(),
            "Authentication error: Not authenticated"
        );

        let unknown = AppError::from(SearchError::UserNotFound);
        assert_eq!(unknown.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_sort_is_a_validation_error() {
        let err = SearchError::InvalidSort {
            field: "endDate".to_string(),
            entity: EntityType::Vendor,
        };
        assert_eq!(err.to_string(), "Cannot sort vendor results by 'endDate'");
        assert_eq!(AppError::from(err).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_stay_terminal() {
        let err = SearchError::from(AppError::Database("connection reset".to_string()));
        assert!(matches!(err, SearchError::StoreFailed(_)));
        assert_eq!(
            AppError::from(err).error_code(),
            "DATABASE_ERROR"
        );
    }
}
