//! Unified error handling for the HTTP surface.
//!
//! Provides a single error type with an explicit kind → status table and
//! conversion to Axum HTTP responses.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Account mutation that can fail at the store level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Create,
    Update,
    Delete,
    ChangePassword,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserAction::Create => write!(f, "create user"),
            UserAction::Update => write!(f, "update user"),
            UserAction::Delete => write!(f, "delete user"),
            UserAction::ChangePassword => write!(f, "change password"),
        }
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Request schema
    #[error("{0}")]
    Validation(String),

    // Account rule violations raised by the service layer
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Store-level failure of a mutation; the cause is kept for logs only
    #[error("Failed to {action}")]
    Failed {
        action: UserAction,
        #[source]
        source: Box<AppError>,
    },

    // Store constraint violation (unique index)
    #[error("{0} already exists")]
    Conflict(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Domain(DomainError::Password(_)) => "INTERNAL_ERROR",
            AppError::Domain(e) => e.code(),
            AppError::Failed { .. } => "UNPROCESSABLE_ENTITY",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code.
    ///
    /// Every account rule violation and every failed mutation shares 422;
    /// clients tell them apart by [`AppError::code`].
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Domain(DomainError::Password(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Domain(_) | AppError::Failed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Domain(DomainError::Password(_)) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            AppError::Database(_) => "A database error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    /// The domain rule this error carries, if any
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the error is a store constraint violation
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = ?self, "Request failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Wrap a store failure of `action`, keeping the cause as the source
    pub fn failed(action: UserAction, source: AppError) -> Self {
        AppError::Failed {
            action,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_share_unprocessable_status() {
        let kinds = [
            DomainError::InvalidPassword,
            DomainError::PasswordMismatch,
            DomainError::EmailAlreadyTaken,
            DomainError::NotFound,
            DomainError::IncorrectPassword,
        ];

        for kind in kinds {
            let err = AppError::from(kind.clone());
            assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY, "{:?}", kind);
            assert_eq!(err.code(), kind.code());
        }
    }

    #[test]
    fn test_failed_hides_source() {
        let err = AppError::failed(
            UserAction::Create,
            AppError::Database(sea_orm::DbErr::Custom("connection reset".to_string())),
        );

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "UNPROCESSABLE_ENTITY");
        assert_eq!(err.user_message(), "Failed to create user");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_failed_messages_per_action() {
        let cases = [
            (UserAction::Update, "Failed to update user"),
            (UserAction::Delete, "Failed to delete user"),
            (UserAction::ChangePassword, "Failed to change password"),
        ];

        for (action, message) in cases {
            let err = AppError::failed(action, AppError::internal("boom"));
            assert_eq!(err.user_message(), message);
        }
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::validation("Name is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Name is required");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Database(sea_orm::DbErr::Custom("password=hunter2".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("hunter2"));

        let err = AppError::from(DomainError::password("salt failure"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("salt"));
    }

    #[test]
    fn test_internal_error_keeps_detail_out_of_message() {
        let err = AppError::internal("argon2: invalid params");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::from(DomainError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = AppError::conflict("Email").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
