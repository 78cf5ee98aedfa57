//! Lead console service.
//!
//! Every call reads the collection fresh from the store, so the console
//! always reflects the latest edits, including ones made by the storefront
//! or the CLI.

use thiserror::Error;

use leadbook_core::{Lead, LeadEdit, LeadId, ValidationErrors};
use leadbook_store::RecordStore;

/// Reasons an inline edit is not applied.
#[derive(Debug, Error)]
pub enum LeadEditError {
    #[error("invalid lead fields")]
    Validation(ValidationErrors),

    #[error("lead not found")]
    NotFound,
}

/// Lead console operations over the record store.
pub struct LeadConsole<'a> {
    store: &'a RecordStore,
}

impl<'a> LeadConsole<'a> {
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Leads matching `term` in stored order. A blank term matches all.
    #[must_use]
    pub fn list(&self, term: &str) -> Vec<Lead> {
        self.store
            .list_leads()
            .into_iter()
            .filter(|lead| lead.matches(term))
            .collect()
    }

    #[must_use]
    pub fn find(&self, id: &LeadId) -> Option<Lead> {
        self.store.list_leads().into_iter().find(|lead| &lead.id == id)
    }

    /// Validate `edit` and merge it into the lead.
    ///
    /// # Errors
    ///
    /// Returns `LeadEditError::Validation` with one message per bad field,
    /// or `LeadEditError::NotFound` if no lead has `id`.
    pub fn update(&self, id: &LeadId, edit: LeadEdit) -> Result<Lead, LeadEditError> {
        let update = edit.validate().map_err(LeadEditError::Validation)?;
        self.store
            .update_lead(id, update)
            .ok_or(LeadEditError::NotFound)
    }

    /// Remove the lead. `false` means storage failed.
    #[must_use]
    pub fn delete(&self, id: &LeadId) -> bool {
        self.store.delete_lead(id)
    }
}
