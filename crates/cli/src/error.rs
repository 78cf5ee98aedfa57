//! CLI error type.

use thiserror::Error;

use leadbook_admin::services::AdminAuthError;
use leadbook_core::ValidationErrors;
use leadbook_store::StoreError;

/// Errors reported by `leadbook` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Lead and user commands need `leadbook login` first.
    #[error("Not logged in. Run `leadbook login -u <username> -p <password>` first.")]
    NotLoggedIn,

    #[error("Invalid input:\n{}", format_errors(.0))]
    Invalid(ValidationErrors),

    #[error("Invalid OTP. Please try again.")]
    WrongCode,

    #[error("Login failed: {0}")]
    Auth(#[from] AdminAuthError),

    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use leadbook_core::validation::fields;

    use super::*;

    #[test]
    fn test_invalid_lists_each_field() {
        let mut errors = ValidationErrors::single(fields::NAME, "Name must be at least 2 characters");
        errors.add(fields::PHONE, "Phone must be 10 digits");
        let message = CliError::Invalid(errors).to_string();
        assert!(message.contains("  name: Name must be at least 2 characters"));
        assert!(message.contains("  phone: Phone must be 10 digits"));
    }
}
