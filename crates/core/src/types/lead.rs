//! Lead records and their partial updates.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::id::LeadId;
use super::status::LeadStatus;
use crate::validation::ValidatedLead;

/// Curricula offered in the enquiry form.
pub const CURRICULUMS: [&str; 5] = ["CBSE", "ICSE", "IB", "IGCSE", "State Board"];

/// Grades offered in the enquiry form.
pub const GRADES: [&str; 12] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12",
];

/// A prospective student's enrollment enquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub curriculum: String,
    pub grade: String,
    #[serde(default)]
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Build a fresh lead from validated form input.
    ///
    /// New leads always start as [`LeadStatus::Enquired`].
    #[must_use]
    pub fn new(id: LeadId, input: ValidatedLead, created_at: DateTime<Utc>) -> Self {
        let input = input.into_inner();
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            curriculum: input.curriculum,
            grade: input.grade,
            status: LeadStatus::Enquired,
            created_at,
        }
    }

    /// Creation time as an ISO-8601 string with millisecond precision.
    #[must_use]
    pub fn created_at_iso(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Case-insensitive free-text match against every field's string form.
    ///
    /// An empty (or all-whitespace) term matches every lead.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let created_at = self.created_at_iso();
        [
            self.id.as_str(),
            &self.name,
            &self.email,
            &self.phone,
            &self.curriculum,
            &self.grade,
            self.status.label(),
            &created_at,
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
    }
}

/// The mutable fields of a [`Lead`]; `None` leaves a field untouched.
///
/// The ID and creation time are never changed by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub curriculum: Option<String>,
    pub grade: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadUpdate {
    /// An update that only changes the status.
    #[must_use]
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `true` if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.curriculum.is_none()
            && self.grade.is_none()
            && self.status.is_none()
    }

    /// Merge the present fields into `lead`.
    pub fn apply_to(self, lead: &mut Lead) {
        if let Some(name) = self.name {
            lead.name = name;
        }
        if let Some(email) = self.email {
            lead.email = email;
        }
        if let Some(phone) = self.phone {
            lead.phone = phone;
        }
        if let Some(curriculum) = self.curriculum {
            lead.curriculum = curriculum;
        }
        if let Some(grade) = self.grade {
            lead.grade = grade;
        }
        if let Some(status) = self.status {
            lead.status = status;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn asha() -> Lead {
        Lead {
            id: LeadId::new("1700000000000"),
            name: "Asha Rao".to_string(),
            email: "asha@x.com".to_string(),
            phone: "9876543210".to_string(),
            curriculum: "CBSE".to_string(),
            grade: "5".to_string(),
            status: LeadStatus::Enquired,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let lead = asha();
        assert!(lead.matches("asha"));
        assert!(lead.matches("ASHA"));
        assert!(lead.matches("  rao "));
    }

    #[test]
    fn test_matches_any_field() {
        let lead = asha();
        assert!(lead.matches("98765"));
        assert!(lead.matches("cbse"));
        assert!(lead.matches("enquired"));
        assert!(lead.matches("2024-03-01"));
        assert!(lead.matches("17000000"));
        assert!(!lead.matches("icse"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(asha().matches(""));
        assert!(asha().matches("   "));
    }

    #[test]
    fn test_matches_multi_word_status() {
        let mut lead = asha();
        lead.status = LeadStatus::DemoAssign;
        assert!(lead.matches("demo assign"));
    }

    #[test]
    fn test_update_only_touches_present_fields() {
        let mut lead = asha();
        LeadUpdate::status(LeadStatus::Enroll).apply_to(&mut lead);

        let mut expected = asha();
        expected.status = LeadStatus::Enroll;
        assert_eq!(lead, expected);
    }

    #[test]
    fn test_empty_update() {
        assert!(LeadUpdate::default().is_empty());
        assert!(!LeadUpdate::status(LeadStatus::Attempted).is_empty());
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(asha()).unwrap();
        assert_eq!(value["id"], "1700000000000");
        assert_eq!(value["status"], "Enquired");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_missing_status_defaults_to_enquired() {
        let json = r#"{"id":"1","name":"Ravi","email":"ravi@x.com","phone":"9999999999",
            "curriculum":"IB","grade":"3","createdAt":"2024-03-01T10:30:00.000Z"}"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.status, LeadStatus::Enquired);
    }
}
