//! Admin user and session marker types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::AdminUserId;

/// An admin account allowed into the lead console.
///
/// Only the Argon2 PHC string of the password is stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    pub password_hash: String,
}

impl std::fmt::Debug for AdminUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Marker asserting that an admin is logged in.
///
/// Presence alone grants access; no expiry is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub user_id: AdminUserId,
    /// Creation time as Unix milliseconds.
    pub timestamp: i64,
}

impl AdminSession {
    /// Start a session for `user_id` at `now`.
    #[must_use]
    pub fn new(user_id: AdminUserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            timestamp: now.timestamp_millis(),
        }
    }

    /// When the session was created, if the stored timestamp is in range.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_session_json_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let session = AdminSession::new(AdminUserId::new("1"), now);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["userId"], "1");
        assert_eq!(value["timestamp"], now.timestamp_millis());
        assert_eq!(session.started_at(), Some(now));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let user = AdminUser {
            id: AdminUserId::new("1"),
            username: "admin".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
        };
        let debug = format!("{user:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("argon2id"));
    }
}
