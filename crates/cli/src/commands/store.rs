//! Store setup.

use std::io::Write;
use std::path::Path;

use leadbook_store::RecordStore;

use crate::error::CliError;

/// Report on a store that [`RecordStore::open`] has already initialized.
///
/// # Errors
///
/// Returns `CliError::Io` if the report cannot be written.
pub fn init(store: &RecordStore, data_path: &Path, out: &mut impl Write) -> Result<(), CliError> {
    store.readiness()?;
    writeln!(out, "Store ready at {}", data_path.display())?;
    writeln!(
        out,
        "  {} lead(s), {} admin user(s)",
        store.list_leads().len(),
        store.list_admin_users().len()
    )?;
    Ok(())
}
