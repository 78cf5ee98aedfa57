//! Session middleware configuration for admin.
//!
//! Sessions live in process memory with stricter cookie settings than the
//! storefront (`SameSite=Strict`, configurable inactivity expiry). A restart
//! logs every admin out.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "leadbook_admin_session";

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::hours(config.session_hours),
        ))
        .with_secure(config.is_secure())
        // Strict: the console is never entered from another site
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
