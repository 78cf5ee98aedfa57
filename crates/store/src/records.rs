//! Typed record collections over a [`StorageBackend`].
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `<namespace>:leads` | JSON array of [`Lead`] |
//! | `<namespace>:users` | JSON array of [`AdminUser`] |
//! | `<namespace>:adminSession` | JSON [`AdminSession`], absent when logged out |
//!
//! # Failure model
//!
//! Every operation is best-effort. Backend failures and corrupt values are
//! logged and degrade to an empty result or a no-op, so callers cannot tell
//! "not found" from "storage broken". Mutations never overwrite a value they
//! failed to read.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use leadbook_core::{
    AdminSession, AdminUser, AdminUserId, Lead, LeadId, LeadUpdate, ValidatedLead,
};

use crate::backend::{MemoryStorage, StorageBackend};
use crate::error::{Result, StoreError};
use crate::file::FileStorage;
use crate::password::{hash_password, verify_password};

/// ID of the admin seeded by [`RecordStore::initialize`].
pub const DEFAULT_ADMIN_ID: &str = "1";
/// Username of the seeded admin.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Password of the seeded admin.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "leadbook";

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix for every key. An empty namespace uses the bare key names.
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl StoreConfig {
    /// Configuration with the given namespace.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    fn key(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_owned()
        } else {
            format!("{}:{name}", self.namespace)
        }
    }
}

#[derive(Debug, Clone)]
struct Keys {
    leads: String,
    users: String,
    session: String,
}

impl Keys {
    fn new(config: &StoreConfig) -> Self {
        Self {
            leads: config.key("leads"),
            users: config.key("users"),
            session: config.key("adminSession"),
        }
    }
}

/// Lead, admin-user and session-marker records.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn StorageBackend>,
    keys: Keys,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Create a store over `backend`.
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static, config: &StoreConfig) -> Self {
        Self::from_shared(Arc::new(backend), config)
    }

    /// Create a store over an already shared backend.
    #[must_use]
    pub fn from_shared(backend: Arc<dyn StorageBackend>, config: &StoreConfig) -> Self {
        Self {
            backend,
            keys: Keys::new(config),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open an initialized store: file-backed at `data_path`, or in memory
    /// when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file's directory cannot be created.
    pub fn open(data_path: Option<&Path>, config: &StoreConfig) -> Result<Self> {
        let store = match data_path {
            Some(path) => Self::new(FileStorage::open(path)?, config),
            None => {
                tracing::warn!("No data path configured, records will not survive a restart");
                Self::new(MemoryStorage::new(), config)
            }
        };
        store.initialize();
        Ok(store)
    }

    /// An initialized store over a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Self::new(MemoryStorage::new(), &StoreConfig::default());
        store.initialize();
        store
    }

    /// Reports whether the backend can currently be read.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StoreError`].
    pub fn readiness(&self) -> Result<()> {
        self.backend.readiness()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Seed an empty lead list and the default admin, each only if absent.
    ///
    /// Safe to call any number of times.
    pub fn initialize(&self) {
        if let Err(e) = self.try_initialize() {
            tracing::error!(error = %e, "Failed to initialize record store");
        }
    }

    fn try_initialize(&self) -> Result<()> {
        let _guard = self.write_guard()?;

        if self.backend.get_item(&self.keys.leads)?.is_none() {
            self.write_json(&self.keys.leads, &Vec::<Lead>::new())?;
            tracing::debug!(key = %self.keys.leads, "Seeded empty lead collection");
        }

        if self.backend.get_item(&self.keys.users)?.is_none() {
            let admin = AdminUser {
                id: AdminUserId::new(DEFAULT_ADMIN_ID),
                username: DEFAULT_ADMIN_USERNAME.to_string(),
                password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
            };
            self.write_json(&self.keys.users, &vec![admin])?;
            tracing::info!(username = DEFAULT_ADMIN_USERNAME, "Seeded default admin user");
        }

        Ok(())
    }

    // =========================================================================
    // Leads
    // =========================================================================

    /// All leads in insertion order.
    #[must_use]
    pub fn list_leads(&self) -> Vec<Lead> {
        self.read_list(&self.keys.leads).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read leads");
            Vec::new()
        })
    }

    /// Save a new lead built from `input`, created at `now`.
    ///
    /// The ID is picked while the collection is held for writing: `now` in
    /// Unix milliseconds, moved forward one millisecond at a time while the
    /// value is taken. The record is returned even if storage failed.
    pub fn append_new_lead(&self, input: ValidatedLead, now: DateTime<Utc>) -> Lead {
        let mut lead = Lead::new(LeadId::from_millis(now.timestamp_millis()), input, now);
        let result = self.modify_leads(|leads| {
            lead.id = next_free_id(leads, now);
            leads.push(lead.clone());
            Some(())
        });
        match result {
            Ok(_) => tracing::info!(lead_id = %lead.id, "Lead saved"),
            Err(e) => tracing::error!(lead_id = %lead.id, error = %e, "Error saving lead"),
        }
        lead
    }

    /// Merge `update` into the lead with `id`.
    ///
    /// Returns the updated record, or `None` if no lead has that ID or
    /// storage failed.
    #[must_use]
    pub fn update_lead(&self, id: &LeadId, update: LeadUpdate) -> Option<Lead> {
        let result = self.modify_leads(|leads| {
            let lead = leads.iter_mut().find(|lead| &lead.id == id)?;
            update.apply_to(lead);
            Some(lead.clone())
        });
        match result {
            Ok(updated) => {
                if updated.is_some() {
                    tracing::info!(lead_id = %id, "Lead updated");
                }
                updated
            }
            Err(e) => {
                tracing::error!(lead_id = %id, error = %e, "Error updating lead");
                None
            }
        }
    }

    /// Remove every lead with `id`.
    ///
    /// Returns `true` when storage succeeded, whether or not a record was
    /// removed, so deleting twice is harmless.
    #[must_use]
    pub fn delete_lead(&self, id: &LeadId) -> bool {
        let result = self.modify_leads(|leads| {
            let before = leads.len();
            leads.retain(|lead| &lead.id != id);
            (leads.len() != before).then_some(())
        });
        match result {
            Ok(removed) => {
                tracing::info!(lead_id = %id, removed = removed.is_some(), "Lead deleted");
                true
            }
            Err(e) => {
                tracing::error!(lead_id = %id, error = %e, "Error deleting lead");
                false
            }
        }
    }

    /// Read-modify-write of the lead list. `f` returning `None` skips the
    /// write.
    fn modify_leads<T>(&self, f: impl FnOnce(&mut Vec<Lead>) -> Option<T>) -> Result<Option<T>> {
        let _guard = self.write_guard()?;
        let mut leads: Vec<Lead> = self.read_list(&self.keys.leads)?;
        let outcome = f(&mut leads);
        if outcome.is_some() {
            self.write_json(&self.keys.leads, &leads)?;
        }
        Ok(outcome)
    }

    // =========================================================================
    // Admin users
    // =========================================================================

    /// All admin users.
    #[must_use]
    pub fn list_admin_users(&self) -> Vec<AdminUser> {
        self.read_list(&self.keys.users).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read admin users");
            Vec::new()
        })
    }

    /// The admin whose username matches exactly and whose password verifies.
    #[must_use]
    pub fn validate_credentials(&self, username: &str, password: &str) -> Option<AdminUser> {
        self.list_admin_users()
            .into_iter()
            .find(|user| user.username == username && verify_password(password, &user.password_hash))
    }

    // =========================================================================
    // Session marker
    // =========================================================================

    /// Record that `user_id` is logged in, stamped with the current time.
    pub fn set_session(&self, user_id: &AdminUserId) {
        let session = AdminSession::new(user_id.clone(), Utc::now());
        if let Err(e) = self.write_json(&self.keys.session, &session) {
            tracing::error!(user_id = %user_id, error = %e, "Error setting session");
        }
    }

    /// The current session marker, if any.
    #[must_use]
    pub fn get_session(&self) -> Option<AdminSession> {
        match self.read_json(&self.keys.session) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session");
                None
            }
        }
    }

    /// Remove the session marker.
    pub fn clear_session(&self) {
        if let Err(e) = self.backend.remove_item(&self.keys.session) {
            tracing::error!(error = %e, "Error clearing session");
        }
    }

    // =========================================================================
    // JSON helpers
    // =========================================================================

    fn write_guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.backend
            .get_item(key)?
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.read_json(key)?.unwrap_or_default())
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(StoreError::Encode)?;
        self.backend.set_item(key, &raw)
    }
}

fn next_free_id(leads: &[Lead], now: DateTime<Utc>) -> LeadId {
    let mut millis = now.timestamp_millis();
    while leads.iter().any(|lead| lead.id.as_millis() == Some(millis)) {
        millis += 1;
    }
    LeadId::from_millis(millis)
}
