/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`; the conversion from the shared
/// error taxonomy decides the status code, so a handler normally just
/// propagates with `?`.
///
/// # Status mapping
///
/// | Core error          | HTTP |
/// |---------------------|------|
/// | Validation          | 422  |
/// | DuplicateEmail      | 409  |
/// | InvalidCredentials  | 401  |
/// | Unauthenticated     | 401  |
/// | AccessDenied        | 403  |
/// | NotFound            | 404  |
/// | Password / Store    | 500  |
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crewtask_shared::error::{Error, FieldError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. duplicate email
    Conflict(String),

    /// Unprocessable entity (422), validation errors
    ValidationError(Vec<FieldError>),

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert core errors to API errors
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(details) => ApiError::ValidationError(details),
            Error::DuplicateEmail => ApiError::Conflict("Email already exists".to_string()),
            Error::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            Error::Unauthenticated => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            Error::AccessDenied => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
            Error::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            Error::Password(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
            Error::Store(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("user not found".to_string());
        assert_eq!(err.to_string(), "Not found: user not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            FieldError {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            FieldError {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_core_error_status_mapping() {
        let cases = [
            (Error::DuplicateEmail, StatusCode::CONFLICT),
            (Error::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (Error::Unauthenticated, StatusCode::UNAUTHORIZED),
            (Error::AccessDenied, StatusCode::FORBIDDEN),
            (Error::NotFound("task"), StatusCode::NOT_FOUND),
            (Error::Validation(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
        ];

        for (core_err, expected) in cases {
            let response = ApiError::from(core_err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_login_failures_map_to_the_same_response() {
        // Unknown email and wrong password must be indistinguishable all
        // the way out to the HTTP layer.
        let a = ApiError::from(Error::InvalidCredentials).into_response();
        let b = ApiError::from(Error::InvalidCredentials).into_response();
        assert_eq!(a.status(), b.status());
        assert_eq!(a.status(), StatusCode::UNAUTHORIZED);
    }
}
