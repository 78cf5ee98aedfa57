//! Application state shared across handlers.

use std::sync::Arc;

use leadbook_store::RecordStore;

use crate::config::StorefrontConfig;
use crate::services::LeadIntake;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// record store and the intake service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: RecordStore,
    intake: LeadIntake,
}

impl AppState {
    /// Create a new application state over an opened store.
    #[must_use]
    pub fn new(config: &StorefrontConfig, store: RecordStore) -> Self {
        let intake = LeadIntake::new(store.clone(), config.otp_delay);
        Self {
            inner: Arc::new(AppStateInner {
                store,
                intake,
            }),
        }
    }

    /// Get a reference to the record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }

    /// Get a reference to the enquiry intake service.
    #[must_use]
    pub fn intake(&self) -> &LeadIntake {
        &self.inner.intake
    }
}
