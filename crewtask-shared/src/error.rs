/// Common error taxonomy
///
/// Every fallible operation in this crate reports `Error`. The variants map
/// one-to-one onto the externally observable failure classes: input shape
/// problems, duplicate signups, bad login attempts, missing/invalid bearer
/// tokens, authorization refusals, missing entities, and store failures.
///
/// Two deliberate collapses live at the call sites rather than here:
/// unknown-email and wrong-password both surface as `InvalidCredentials`,
/// and the ownership guards answer `AccessDenied` even when the entity does
/// not exist, so a caller can never probe for existence through them.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Human-readable message
    pub message: String,
}

/// Errors reported by the stores, guards, and session operations
#[derive(Debug, Error)]
pub enum Error {
    /// Input failed shape validation before touching the store
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Signup with an email that is already registered (case-insensitive)
    #[error("email address is already registered")]
    DuplicateEmail,

    /// Login failed; unknown email and wrong password are indistinguishable
    #[error("invalid email or password")]
    InvalidCredentials,

    /// No live session matches the presented token
    #[error("authentication required")]
    Unauthenticated,

    /// Caller lacks the required relationship to the entity
    #[error("access denied")]
    AccessDenied,

    /// Entity does not exist (only where absence is not access-sensitive)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Password hashing or verification failed internally
    #[error("password hashing failed: {0}")]
    Password(#[from] crate::auth::password::PasswordError),

    /// Underlying database failure
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl Error {
    /// Flattens `validator` derive output into field-level details
    pub fn from_validation_errors(errors: validator::ValidationErrors) -> Self {
        let details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        Error::Validation(details)
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
