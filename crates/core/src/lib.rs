//! Leadbook Core - shared types and validation rules.
//!
//! This crate provides the pieces shared by every Leadbook component:
//! - `storefront` - Public enquiry site
//! - `admin` - Lead console
//! - `cli` - Local operator tool
//!
//! # Architecture
//!
//! The core crate contains only types, rules and state machines - no I/O,
//! no storage access, no HTTP. Persistence lives in `leadbook-store`.
//!
//! # Modules
//!
//! - [`types`] - Leads, statuses, admin users, IDs and emails
//! - [`validation`] - Field rules for enquiries, lead edits and admin login
//! - [`intake`] - The enquiry/OTP state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod intake;
pub mod types;
pub mod validation;

pub use intake::{DEMO_OTP, IntakeStage, SubmitDecision};
pub use types::*;
pub use validation::{AdminLogin, LeadEdit, LeadSubmission, ValidatedLead, ValidationErrors};
