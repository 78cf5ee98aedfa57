//! Admin authentication error types.

use thiserror::Error;

use leadbook_core::ValidationErrors;

/// Message shown when the username/password pair does not match.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Errors that can occur during admin login.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// A required field was empty.
    #[error("invalid login input")]
    Validation(ValidationErrors),

    /// No admin matches the username/password pair.
    #[error("invalid username or password")]
    InvalidCredentials,
}

impl AdminAuthError {
    /// Text shown above the login form.
    #[must_use]
    pub const fn form_message(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) => None,
            Self::InvalidCredentials => Some(INVALID_CREDENTIALS_MESSAGE),
        }
    }
}
