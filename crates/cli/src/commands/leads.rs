//! Lead management commands. All of them need `leadbook login` first.

use std::io::{BufRead, Write};

use leadbook_admin::services::{LeadConsole, LeadEditError};
use leadbook_core::{LeadEdit, LeadId};
use leadbook_store::RecordStore;

use super::require_session;
use crate::error::CliError;

/// Print leads matching `search` as a table.
///
/// # Errors
///
/// Returns `CliError::NotLoggedIn` without a valid session marker.
pub fn list(store: &RecordStore, search: &str, out: &mut impl Write) -> Result<(), CliError> {
    require_session(store)?;
    let leads = LeadConsole::new(store).list(search);

    writeln!(
        out,
        "{:<14} {:<20} {:<28} {:<11} {:<12} {:<5} {:<14} CREATED",
        "ID", "NAME", "EMAIL", "PHONE", "CURRICULUM", "GRADE", "STATUS"
    )?;
    for lead in &leads {
        writeln!(
            out,
            "{:<14} {:<20} {:<28} {:<11} {:<12} {:<5} {:<14} {}",
            lead.id.as_str(),
            lead.name,
            lead.email,
            lead.phone,
            lead.curriculum,
            lead.grade,
            lead.status.label(),
            lead.created_at_iso()
        )?;
    }
    if leads.is_empty() {
        writeln!(out, "No leads found")?;
    }
    writeln!(out, "Total leads: {}", leads.len())?;
    Ok(())
}

/// Change one lead's status.
///
/// # Errors
///
/// Returns `CliError::Invalid` for an unknown status and
/// `CliError::LeadNotFound` for an unknown ID.
pub fn set_status(
    store: &RecordStore,
    id: &str,
    status: String,
    out: &mut impl Write,
) -> Result<(), CliError> {
    require_session(store)?;
    let edit = LeadEdit {
        status: Some(status),
        ..LeadEdit::default()
    };

    match LeadConsole::new(store).update(&LeadId::new(id), edit) {
        Ok(lead) => {
            writeln!(out, "Lead updated successfully: {} is now {}", lead.id, lead.status)?;
            Ok(())
        }
        Err(LeadEditError::Validation(errors)) => Err(CliError::Invalid(errors)),
        Err(LeadEditError::NotFound) => Err(CliError::LeadNotFound(id.to_string())),
    }
}

/// Delete one lead, asking on `input` first unless `yes` is set.
///
/// # Errors
///
/// Returns `CliError::LeadNotFound` for an unknown ID.
pub fn delete(
    store: &RecordStore,
    id: &str,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CliError> {
    require_session(store)?;
    let console = LeadConsole::new(store);
    let id = LeadId::new(id);
    let lead = console
        .find(&id)
        .ok_or_else(|| CliError::LeadNotFound(id.to_string()))?;

    if !yes {
        write!(
            out,
            "Are you sure you want to delete {} <{}>? [y/N] ",
            lead.name, lead.email
        )?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "Cancelled")?;
            return Ok(());
        }
    }

    if console.delete(&id) {
        writeln!(out, "Lead deleted successfully")?;
    } else {
        writeln!(out, "Failed to delete lead")?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use leadbook_core::LeadStatus;

    use super::*;
    use crate::commands::test_support::{logged_in, seed_lead, text};

    #[test]
    fn test_list_requires_login() {
        let store = RecordStore::in_memory();
        assert!(matches!(
            list(&store, "", &mut Vec::new()),
            Err(CliError::NotLoggedIn)
        ));
    }

    #[test]
    fn test_list_filters() {
        let store = logged_in();
        seed_lead(&store, "Asha Rao", "asha@x.com");
        seed_lead(&store, "Vikram Shah", "vikram@y.org");

        let mut out = Vec::new();
        list(&store, "asha", &mut out).unwrap();
        let report = text(out);
        assert!(report.contains("Asha Rao"));
        assert!(!report.contains("Vikram"));
        assert!(report.ends_with("Total leads: 1\n"));
    }

    #[test]
    fn test_set_status() {
        let store = logged_in();
        let lead = seed_lead(&store, "Asha Rao", "asha@x.com");

        let mut out = Vec::new();
        set_status(&store, lead.id.as_str(), "Demo Assign".to_string(), &mut out).unwrap();
        assert_eq!(store.list_leads()[0].status, LeadStatus::DemoAssign);

        let err = set_status(&store, lead.id.as_str(), "Lost".to_string(), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, CliError::Invalid(_)));

        let err = set_status(&store, "42", "Enroll".to_string(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::LeadNotFound(id) if id == "42"));
    }

    #[test]
    fn test_delete_prompts() {
        let store = logged_in();
        let lead = seed_lead(&store, "Asha Rao", "asha@x.com");

        let mut out = Vec::new();
        delete(&store, lead.id.as_str(), false, &mut &b"n\n"[..], &mut out).unwrap();
        assert!(text(out).ends_with("Cancelled\n"));
        assert_eq!(store.list_leads().len(), 1);

        let mut out = Vec::new();
        delete(&store, lead.id.as_str(), false, &mut &b"y\n"[..], &mut out).unwrap();
        assert!(text(out).ends_with("Lead deleted successfully\n"));
        assert!(store.list_leads().is_empty());
    }

    #[test]
    fn test_delete_unknown() {
        let store = logged_in();
        let err = delete(&store, "42", true, &mut &b""[..], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::LeadNotFound(_)));
    }
}
