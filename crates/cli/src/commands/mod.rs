//! `leadbook` subcommands.
//!
//! Each command writes its report to the given writer and returns
//! [`CliError`] on failure, so the binary decides where output goes.

pub mod enquiry;
pub mod leads;
pub mod session;
pub mod store;
pub mod users;

use leadbook_core::{AdminSession, AdminUser};
use leadbook_store::RecordStore;

use crate::error::CliError;

/// The session marker and the admin it names.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` when there is no marker or its user no
/// longer exists.
pub fn require_session(store: &RecordStore) -> Result<(AdminSession, AdminUser), CliError> {
    let session = store.get_session().ok_or(CliError::NotLoggedIn)?;
    let user = store
        .list_admin_users()
        .into_iter()
        .find(|user| user.id == session.user_id)
        .ok_or(CliError::NotLoggedIn)?;
    Ok((session, user))
}
