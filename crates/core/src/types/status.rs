//! Lead pipeline status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the known lead statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lead status: {0}")]
pub struct InvalidLeadStatus(pub String);

/// Where a lead is in the enrollment pipeline.
///
/// Serialized with its display label (`"Demo Assign"`), which is also the
/// value used in HTML forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LeadStatus {
    #[default]
    Enquired,
    Attempted,
    #[serde(rename = "Demo Assign")]
    DemoAssign,
    #[serde(rename = "Demo Complete")]
    DemoComplete,
    #[serde(rename = "Invoice Send")]
    InvoiceSend,
    Enroll,
}

impl LeadStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Enquired,
        Self::Attempted,
        Self::DemoAssign,
        Self::DemoComplete,
        Self::InvoiceSend,
        Self::Enroll,
    ];

    /// Human-readable label, identical to the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enquired => "Enquired",
            Self::Attempted => "Attempted",
            Self::DemoAssign => "Demo Assign",
            Self::DemoComplete => "Demo Complete",
            Self::InvoiceSend => "Invoice Send",
            Self::Enroll => "Enroll",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = InvalidLeadStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| InvalidLeadStatus(s.to_owned()))
    }
}
