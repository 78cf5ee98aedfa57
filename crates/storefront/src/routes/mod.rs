//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                    - Landing page with the enquiry form
//! POST /enquiry/send-code   - "Send" the verification code (re-renders form)
//! POST /enquiry             - Submit the enquiry (redirects to /?booked=1)
//! GET  /static/site.css     - Stylesheet
//! GET  /health              - Liveness check
//! GET  /health/ready        - Store readiness check
//! ```

pub mod assets;
pub mod enquiry;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the enquiry routes router.
pub fn enquiry_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(enquiry::submit))
        .route("/send-code", post(enquiry::send_code))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(enquiry::home))
        .nest("/enquiry", enquiry_routes())
        .route("/static/site.css", get(assets::stylesheet))
}
