//! Types stored in the admin session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use leadbook_core::{AdminSession, AdminUser, AdminUserId};

/// Session-stored admin identity.
///
/// Wraps the `{userId, timestamp}` marker written at login together with
/// the username shown in the console header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub username: String,
    pub session: AdminSession,
}

impl CurrentAdmin {
    /// Marker for `user` logging in at `now`.
    #[must_use]
    pub fn logged_in(user: &AdminUser, now: DateTime<Utc>) -> Self {
        Self {
            username: user.username.clone(),
            session: AdminSession::new(user.id.clone(), now),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &AdminUserId {
        &self.session.user_id
    }
}

/// Flash notice styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A one-shot notice carried across a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Queue this notice for the next page render.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn push(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::FLASH, self).await
    }

    /// Remove and return the queued notice, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn take(session: &Session) -> Result<Option<Self>, tower_sessions::session::Error> {
        session.remove::<Self>(keys::FLASH).await
    }
}

/// Session keys for admin data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the pending flash notice.
    pub const FLASH: &str = "flash";
}
