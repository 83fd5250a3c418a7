//! # Error Handling
//!
//! Every handler returns `Result<_, ApiError>`. The error knows its HTTP status,
//! renders a sanitized JSON body and logs whatever must stay server-side.
//!
//! Database failures surfacing from a save are classified by the SQL error the
//! driver reports:
//!
//! - unique constraint violation -> 409 Conflict
//! - foreign key violation -> 422 Unprocessable Entity
//! - `DbErr::RecordNotFound` -> 404 Not Found
//! - anything else -> 500, details logged and never sent to the client
//!
//! ```rust,ignore
//! let movie = ctx
//!     .get::<movie::Entity>(id)
//!     .await?
//!     .ok_or_else(|| ApiError::not_found("Movie", Some(id.to_string())))?;
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found - Resource doesn't exist
    NotFound {
        /// Resource type (e.g., "Movie", "Genre")
        resource: String,
        /// Optional ID that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - Malformed input from the client
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 409 Conflict - Unique key already taken
    Conflict {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - Validation or referential constraint failed
    ValidationFailed {
        /// User-facing validation errors
        errors: Vec<String>,
    },

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - Generic internal error
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 404 Not Found error
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a 422 Validation Failed error
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Create a 500 error from a database error without classifying it.
    ///
    /// The database error details are logged but NOT sent to the user.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Create a 500 Internal Server Error with optional details
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => {
                if let Some(id) = id {
                    format!("{resource} with ID '{id}' not found")
                } else {
                    format!("{resource} not found")
                }
            }
            Self::BadRequest { message }
            | Self::Conflict { message }
            | Self::Database { message, .. }
            | Self::Internal { message, .. } => message.clone(),
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Convert a `DbErr` raised while reading or saving.
///
/// Constraint violations are reported by the driver through `DbErr::sql_err`;
/// those become 409/422 so clients can correct the request.
impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotFound(msg) = &err {
            let resource = msg.split_whitespace().next().unwrap_or("Resource");
            return Self::NotFound {
                resource: resource.to_string(),
                id: None,
            };
        }

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(detail = %detail, "Unique constraint violated");
                Self::conflict("A record with the same unique value already exists")
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::debug!(detail = %detail, "Foreign key constraint violated");
                Self::validation_failed(vec![
                    "A referenced record does not exist".to_string(),
                ])
            }
            _ => Self::database(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed {
            errors: errors.errors().iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_not_found_with_id() {
        let err = ApiError::not_found("Movie", Some("123".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Movie with ID '123' not found");
    }

    #[test]
    fn test_not_found_without_id() {
        let err = ApiError::not_found("Movie", None);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Movie not found");
    }

    #[test]
    fn test_bad_request() {
        let err = ApiError::bad_request("Invalid filter");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Invalid filter");
    }

    #[test]
    fn test_conflict() {
        let err = ApiError::conflict("Genre already exists");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "Genre already exists");
    }

    #[test]
    fn test_validation_failed_single_error() {
        let err = ApiError::validation_failed(vec!["title: This field is required".to_string()]);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.user_message(), "title: This field is required");
    }

    #[test]
    fn test_validation_failed_multiple_errors() {
        let err = ApiError::validation_failed(vec![
            "title is required".to_string(),
            "price too large".to_string(),
        ]);
        assert_eq!(
            err.user_message(),
            "Validation failed: title is required, price too large"
        );
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = ApiError::database(DbErr::Type("Type mismatch error".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "A database error occurred");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::internal("Processing failed", Some("stack trace".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Processing failed");
    }

    #[test]
    fn test_dberr_record_not_found_becomes_404() {
        let api_err: ApiError = DbErr::RecordNotFound("Movie not found".to_string()).into();
        assert_eq!(api_err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api_err.user_message(), "Movie not found");
    }

    #[test]
    fn test_other_dberr_become_500() {
        let test_cases = vec![
            DbErr::Custom("Any custom error".to_string()),
            DbErr::Type("Type error".to_string()),
            DbErr::Json("JSON error".to_string()),
        ];

        for db_err in test_cases {
            let api_err: ApiError = db_err.into();
            assert_eq!(api_err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api_err.user_message(), "A database error occurred");
        }
    }

    #[test]
    fn test_validation_errors_conversion() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("price", "Must be at most 9999999.99"));
        errors.add(ValidationError::new("cinema_id", "Must be at least 1"));

        let api_err: ApiError = errors.into();
        assert_eq!(api_err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match api_err {
            ApiError::ValidationFailed { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0], "price: Must be at most 9999999.99");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_display_trait() {
        let err = ApiError::bad_request("Test error");
        assert_eq!(format!("{err}"), "Test error");
    }
}
