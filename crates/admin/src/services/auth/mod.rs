//! Admin authentication service.
//!
//! Checks a login form against the admin users in the record store. There is
//! no lockout or rate limiting; the console is meant for a trusted network.

mod error;

pub use error::{AdminAuthError, INVALID_CREDENTIALS_MESSAGE};

use secrecy::ExposeSecret;

use leadbook_core::{AdminLogin, AdminUser};
use leadbook_store::RecordStore;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    store: &'a RecordStore,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Validate the form, then look up the matching admin.
    ///
    /// Password verification runs Argon2, so callers on an async runtime
    /// should run this on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::Validation` if a field is empty and
    /// `AdminAuthError::InvalidCredentials` if nothing matches.
    pub fn authenticate(&self, login: &AdminLogin) -> Result<AdminUser, AdminAuthError> {
        login.validate().map_err(AdminAuthError::Validation)?;

        match self
            .store
            .validate_credentials(&login.username, login.password.expose_secret())
        {
            Some(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "Admin login");
                Ok(user)
            }
            None => {
                tracing::warn!(username = %login.username, "Admin login rejected");
                Err(AdminAuthError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use leadbook_core::validation::fields;
    use leadbook_store::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};

    use super::*;

    #[test]
    fn test_default_admin_logs_in() {
        let store = RecordStore::in_memory();
        let user = AdminAuthService::new(&store)
            .authenticate(&AdminLogin::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD))
            .unwrap();
        assert_eq!(user.id.as_str(), "1");
    }

    #[test]
    fn test_wrong_password() {
        let store = RecordStore::in_memory();
        let err = AdminAuthService::new(&store)
            .authenticate(&AdminLogin::new("admin", "admin1234"))
            .unwrap_err();
        assert!(matches!(err, AdminAuthError::InvalidCredentials));
        assert_eq!(err.form_message(), Some("Invalid username or password"));
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let store = RecordStore::in_memory();
        let err = AdminAuthService::new(&store)
            .authenticate(&AdminLogin::new("Admin", "admin123"))
            .unwrap_err();
        assert!(matches!(err, AdminAuthError::InvalidCredentials));
    }

    #[test]
    fn test_empty_fields_fail_validation() {
        let store = RecordStore::in_memory();
        let err = AdminAuthService::new(&store)
            .authenticate(&AdminLogin::new("", ""))
            .unwrap_err();
        let AdminAuthError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.first(fields::USERNAME), Some("Username is required"));
        assert_eq!(errors.first(fields::PASSWORD), Some("Password is required"));
    }
}
