//! Enquiry intake state machine.
//!
//! ```text
//! Idle --(send code, email present)--> CodeSent { email }
//! CodeSent --(submit, valid fields, code == DEMO_OTP)--> Idle (lead persisted)
//! ```
//!
//! No code is ever generated or delivered: the only accepted value is
//! [`DEMO_OTP`]. Timing and persistence belong to the caller; this module
//! only decides what a submission should do.

use serde::{Deserialize, Serialize};

use crate::validation::{LeadSubmission, ValidatedLead, ValidationErrors, fields};

/// The fixed verification code accepted by the intake flow.
pub const DEMO_OTP: &str = "123456";

/// Shown when the code step is requested without an email.
pub const EMAIL_REQUIRED_MESSAGE: &str = "Email is required to send OTP";

/// Shown when the entered code does not match [`DEMO_OTP`].
pub const INVALID_OTP_MESSAGE: &str = "Invalid OTP. Demo code is 123456";

/// Shown when the student-enrollment confirmation is not ticked.
pub const STUDENT_CONFIRM_MESSAGE: &str = "Please confirm this is a student enrollment";

/// Where a visitor is in the enquiry flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum IntakeStage {
    #[default]
    Idle,
    /// A code was "sent" to `email`.
    CodeSent { email: String },
}

/// What the caller should do with a submitted enquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Field errors; show them and stay in the current stage.
    Invalid(ValidationErrors),
    /// No code was sent to this email yet; run the send step instead.
    RequestCode { email: String },
    /// A code was sent but the entered one is wrong; keep the entered data.
    WrongCode,
    /// Persist this lead and return to [`IntakeStage::Idle`].
    Accept(ValidatedLead),
}

impl IntakeStage {
    /// Returns `true` once a code has been sent to `email`.
    #[must_use]
    pub fn code_sent_to(&self, email: &str) -> bool {
        matches!(self, Self::CodeSent { email: sent } if sent == email.trim())
    }

    /// Returns `true` once any code has been sent.
    #[must_use]
    pub const fn is_code_sent(&self) -> bool {
        matches!(self, Self::CodeSent { .. })
    }

    /// The stage reached by sending a code to `email`.
    ///
    /// # Errors
    ///
    /// Returns an `email` field error if the address is blank.
    pub fn request_code(email: &str) -> Result<Self, ValidationErrors> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationErrors::single(
                fields::EMAIL,
                EMAIL_REQUIRED_MESSAGE,
            ));
        }
        Ok(Self::CodeSent {
            email: email.to_owned(),
        })
    }

    /// Decide the outcome of submitting the enquiry form.
    ///
    /// Fields are validated first so the visitor sees every problem at once.
    /// A code sent to a different address than the one submitted does not
    /// count.
    #[must_use]
    pub fn submit(
        &self,
        submission: &LeadSubmission,
        code: &str,
        student_confirmed: bool,
    ) -> SubmitDecision {
        let validated = submission.validate();

        let mut errors = ValidationErrors::new();
        if !student_confirmed {
            errors.add(fields::STUDENT_CONFIRM, STUDENT_CONFIRM_MESSAGE);
        }

        let validated = match validated {
            Ok(validated) if errors.is_empty() => validated,
            Ok(_) => return SubmitDecision::Invalid(errors),
            Err(field_errors) => {
                errors.merge(field_errors);
                return SubmitDecision::Invalid(errors);
            }
        };

        let email = &validated.fields().email;
        if !self.code_sent_to(email) {
            return SubmitDecision::RequestCode {
                email: email.clone(),
            };
        }

        if code.trim() != DEMO_OTP {
            return SubmitDecision::WrongCode;
        }

        SubmitDecision::Accept(validated)
    }
}
