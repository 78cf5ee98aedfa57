//! Business logic services for storefront.
//!
//! # Services
//!
//! - `intake` - Enquiry submission with the simulated verification code

pub mod intake;

pub use intake::{LeadIntake, SubmitOutcome};
