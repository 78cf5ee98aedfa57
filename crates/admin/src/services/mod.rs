//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Username/password login against the record store
//! - `leads` - Lead console: filter, inline edit, delete

pub mod auth;
pub mod leads;

pub use auth::{AdminAuthError, AdminAuthService};
pub use leads::{LeadConsole, LeadEditError};
