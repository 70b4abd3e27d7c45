//! Domain-level errors.
//!
//! These errors represent account rule violations raised by the user
//! service. They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for account rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Password and its confirmation differ on account creation
    #[error("Invalid password")]
    InvalidPassword,

    /// New password and its confirmation differ on password change
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Another account already uses the email address
    #[error("Email already taken")]
    EmailAlreadyTaken,

    /// No account with the requested id
    #[error("Unknown user")]
    NotFound,

    /// The supplied current password does not verify
    #[error("Old password is incorrect")]
    IncorrectPassword,

    /// Password hashing failed
    #[error("Password error: {0}")]
    Password(String),
}

impl DomainError {
    /// Create a password hashing error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidPassword => "INVALID_PASSWORD",
            DomainError::PasswordMismatch => "INVALID_PASSWORD_CONFIRMATION",
            DomainError::EmailAlreadyTaken => "EMAIL_ALREADY_TAKEN",
            DomainError::NotFound => "UNKNOWN_USER",
            DomainError::IncorrectPassword => "INCORRECT_PASSWORD",
            DomainError::Password(_) => "PASSWORD_ERROR",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
