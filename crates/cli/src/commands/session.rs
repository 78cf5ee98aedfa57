//! Operator login state.
//!
//! The CLI's login is the store's session marker: `login` writes
//! `{userId, timestamp}`, `logout` removes it, and lead commands refuse to
//! run without it. Anyone who can write the store file can forge it; it is
//! an operator convenience, not an access control.

use std::io::Write;

use leadbook_admin::services::AdminAuthService;
use leadbook_core::AdminLogin;
use leadbook_store::RecordStore;

use super::require_session;
use crate::error::CliError;

/// Check the credentials and write the session marker.
///
/// # Errors
///
/// Returns `CliError::Auth` for empty fields or a bad username/password.
pub fn login(
    store: &RecordStore,
    username: String,
    password: String,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let user = AdminAuthService::new(store).authenticate(&AdminLogin::new(username, password))?;
    store.set_session(&user.id);
    writeln!(out, "Logged in as {}", user.username)?;
    Ok(())
}

/// Remove the session marker. Logging out twice is fine.
///
/// # Errors
///
/// Returns `CliError::Io` if the report cannot be written.
pub fn logout(store: &RecordStore, out: &mut impl Write) -> Result<(), CliError> {
    store.clear_session();
    writeln!(out, "Logged out")?;
    Ok(())
}

/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a valid session marker.
pub fn whoami(store: &RecordStore, out: &mut impl Write) -> Result<(), CliError> {
    let (session, user) = require_session(store)?;
    match session.started_at() {
        Some(since) => writeln!(
            out,
            "{} (id {}), logged in since {}",
            user.username,
            user.id,
            since.format("%Y-%m-%d %H:%M:%S UTC")
        )?,
        None => writeln!(out, "{} (id {})", user.username, user.id)?,
    }
    Ok(())
}
