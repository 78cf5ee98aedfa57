//! Form validation rules for enquiries, lead edits and admin login.
//!
//! Every rule reports field-level messages so a form can show each one next
//! to its input. Validation never stops at the first failing field.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::types::{CURRICULUMS, Email, GRADES, LeadStatus, LeadUpdate};

/// Field names used as keys in [`ValidationErrors`].
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const CURRICULUM: &str = "curriculum";
    pub const GRADE: &str = "grade";
    pub const STATUS: &str = "status";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const OTP: &str = "otp";
    pub const STUDENT_CONFIRM: &str = "student_confirm";
}

/// Field-level validation failures, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create an error set holding one message.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    /// Append all messages from `other`.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first message recorded for `field`, which is what a form shows.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Iterate over `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(value)` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any message was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Field rules
// =============================================================================

/// Names need at least two characters.
///
/// # Errors
///
/// Returns the form message when the rule fails.
pub fn check_name(name: &str) -> Result<(), &'static str> {
    if name.chars().count() >= 2 {
        Ok(())
    } else {
        Err("Name must be at least 2 characters")
    }
}

/// Emails must have a standard address format.
///
/// # Errors
///
/// Returns the form message when the rule fails.
pub fn check_email(email: &str) -> Result<(), &'static str> {
    Email::parse(email)
        .map(|_| ())
        .map_err(|_| "Invalid email address")
}

/// Phones are exactly ten ASCII digits.
///
/// # Errors
///
/// Returns the form message when the rule fails.
pub fn check_phone(phone: &str) -> Result<(), &'static str> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err("Phone must be 10 digits")
    }
}

/// Curricula come from [`CURRICULUMS`].
///
/// # Errors
///
/// Returns the form message when the rule fails.
pub fn check_curriculum(curriculum: &str) -> Result<(), &'static str> {
    if CURRICULUMS.contains(&curriculum) {
        Ok(())
    } else {
        Err("Please select a curriculum")
    }
}

/// Grades come from [`GRADES`].
///
/// # Errors
///
/// Returns the form message when the rule fails.
pub fn check_grade(grade: &str) -> Result<(), &'static str> {
    if GRADES.contains(&grade) {
        Ok(())
    } else {
        Err("Please select a grade")
    }
}

fn check_into(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    rule: fn(&str) -> Result<(), &'static str>,
) {
    if let Err(message) = rule(value) {
        errors.add(field, message);
    }
}

// =============================================================================
// Enquiry submission
// =============================================================================

/// Raw enquiry form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub curriculum: String,
    #[serde(default)]
    pub grade: String,
}

/// Enquiry input that passed every field rule, with whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLead(LeadSubmission);

impl ValidatedLead {
    /// The trimmed, validated fields.
    #[must_use]
    pub const fn fields(&self) -> &LeadSubmission {
        &self.0
    }

    /// Consume and return the trimmed fields.
    #[must_use]
    pub fn into_inner(self) -> LeadSubmission {
        self.0
    }
}

impl LeadSubmission {
    /// Copy of the input with surrounding whitespace removed from each field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            curriculum: self.curriculum.trim().to_owned(),
            grade: self.grade.trim().to_owned(),
        }
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field.
    pub fn validate(&self) -> Result<ValidatedLead, ValidationErrors> {
        let input = self.trimmed();
        let mut errors = ValidationErrors::new();

        check_into(&mut errors, fields::NAME, &input.name, check_name);
        check_into(&mut errors, fields::EMAIL, &input.email, check_email);
        check_into(&mut errors, fields::PHONE, &input.phone, check_phone);
        check_into(
            &mut errors,
            fields::CURRICULUM,
            &input.curriculum,
            check_curriculum,
        );
        check_into(&mut errors, fields::GRADE, &input.grade, check_grade);

        errors.into_result(ValidatedLead(input))
    }
}

// =============================================================================
// Lead edit
// =============================================================================

/// Raw inline-edit input from the lead console. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeadEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub curriculum: Option<String>,
    pub grade: Option<String>,
    pub status: Option<String>,
}

impl LeadEdit {
    /// Check every present field and build the update.
    ///
    /// # Errors
    ///
    /// Returns one message per failing field.
    pub fn validate(self) -> Result<LeadUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mut checked = |field: &'static str,
                           value: Option<String>,
                           rule: fn(&str) -> Result<(), &'static str>| {
            value.map(|v| v.trim().to_owned()).inspect(|v| {
                check_into(&mut errors, field, v, rule);
            })
        };

        let name = checked(fields::NAME, self.name, check_name);
        let email = checked(fields::EMAIL, self.email, check_email);
        let phone = checked(fields::PHONE, self.phone, check_phone);
        let curriculum = checked(fields::CURRICULUM, self.curriculum, check_curriculum);
        let grade = checked(fields::GRADE, self.grade, check_grade);

        let status = match self.status.as_deref().map(str::trim) {
            None => None,
            Some(raw) => match raw.parse::<LeadStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add(fields::STATUS, "Please select a valid status");
                    None
                }
            },
        };

        errors.into_result(LeadUpdate {
            name,
            email,
            phone,
            curriculum,
            grade,
            status,
        })
    }
}

// =============================================================================
// Admin login
// =============================================================================

/// Admin login input.
#[derive(Debug)]
pub struct AdminLogin {
    pub username: String,
    pub password: SecretString,
}

impl AdminLogin {
    /// Wrap raw form values.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Both fields must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns one message per empty field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.is_empty() {
            errors.add(fields::USERNAME, "Username is required");
        }
        if self.password.expose_secret().is_empty() {
            errors.add(fields::PASSWORD, "Password is required");
        }
        errors.into_result(())
    }
}
