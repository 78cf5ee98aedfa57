//! Core types for Leadbook.
//!
//! This module provides type-safe wrappers for the domain records.

pub mod admin;
pub mod email;
pub mod id;
pub mod lead;
pub mod status;

pub use admin::{AdminSession, AdminUser};
pub use email::{Email, EmailError};
pub use id::*;
pub use lead::{CURRICULUMS, GRADES, Lead, LeadUpdate};
pub use status::{InvalidLeadStatus, LeadStatus};
