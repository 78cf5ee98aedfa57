//! HTTP middleware stack for the admin console.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (unique ID per request)
//! 4. Security headers (locked-down CSP, no caching)
//! 5. Session layer (tower-sessions, in-memory store)
//!
//! Authentication is enforced per handler through the [`RequireAdminAuth`]
//! extractor rather than a router-wide guard.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
