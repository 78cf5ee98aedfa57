//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store readable)
//! GET  /static/admin.css       - Stylesheet
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Check username and password
//! POST /auth/logout            - Logout
//!
//! # Leads (login required)
//! GET  /                       - Redirect to /leads
//! GET  /leads?q=&edit=         - Lead table, filtered by q, row `edit` in edit mode
//! POST /leads/{id}             - Save an inline edit
//! GET  /leads/{id}/delete      - Delete confirmation
//! POST /leads/{id}/delete      - Delete
//! ```

pub mod assets;
pub mod auth;
pub mod leads;

use axum::Router;

use crate::state::AppState;

/// Build the complete admin router (health checks are added in `app`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(leads::router())
        .merge(assets::router())
}
