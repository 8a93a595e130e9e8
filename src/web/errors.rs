//! # Web API Error Types
//!
//! Maps catalog errors onto HTTP responses. Leverages thiserror for structured
//! error handling and Axum's IntoResponse for HTTP conversion.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::{CatalogError, FieldError};

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Validation failed")]
    ValidationFailed { details: Vec<FieldError> },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Validation failure for a single request part, e.g. an undecodable body
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            details: vec![FieldError::new(field, message)],
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::ValidationFailed { .. } => "VALIDATION_FAILED",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let error_response = match &self {
            ApiError::ValidationFailed { details } => json!({
                "error": {
                    "code": self.error_code(),
                    "message": self.to_string(),
                    "details": details
                }
            }),
            _ => json!({
                "error": {
                    "code": self.error_code(),
                    "message": self.to_string()
                }
            }),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::ValidationFailed(errors) => ApiError::ValidationFailed {
                details: errors.errors,
            },
            CatalogError::NotFound { .. } | CatalogError::BookNotFound(_) => {
                ApiError::not_found(message)
            }
            CatalogError::HasDependents { .. } => ApiError::Conflict { message },
            CatalogError::Storage(reason) => {
                // Storage details stay in the logs
                error!(error = %reason, "Storage failure while handling request");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_input("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_input("query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::invalid_input("path", rejection.body_text())
    }
}

/// Result type alias for web API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationErrors;

    #[test]
    fn test_catalog_error_status_mapping() {
        let cases = [
            (CatalogError::book_not_found(1), StatusCode::NOT_FOUND),
            (CatalogError::BookNotFound(1), StatusCode::NOT_FOUND),
            (
                CatalogError::ValidationFailed(ValidationErrors::single("rating", "out of range")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CatalogError::HasDependents {
                    book_id: 1,
                    review_count: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                CatalogError::Storage("connection refused".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_storage_reason_is_not_exposed() {
        let api_error = ApiError::from(CatalogError::Storage("password=hunter2".to_string()));
        assert_eq!(api_error.to_string(), "Internal server error");
    }
}
