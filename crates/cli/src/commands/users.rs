//! Admin user listing.

use std::io::Write;

use leadbook_store::RecordStore;

use super::require_session;
use crate::error::CliError;

/// Print every admin's ID and username. Password hashes are never shown.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a valid session marker.
pub fn list(store: &RecordStore, out: &mut impl Write) -> Result<(), CliError> {
    let (_, current) = require_session(store)?;
    for user in store.list_admin_users() {
        let marker = if user.id == current.id { " (you)" } else { "" };
        writeln!(out, "{:<6} {}{marker}", user.id.as_str(), user.username)?;
    }
    Ok(())
}
