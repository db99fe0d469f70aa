//! Transient user notifications.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// How long a notification stays visible.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(4);

/// Severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
    /// Operation refused before any request was made.
    Warning,
    /// Informational message.
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// A message shown to the user for [`DISPLAY_DURATION`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    kind: NotificationKind,
    message: String,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification stamped with the current time.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns the severity.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` once the display window has elapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at)
            .to_std()
            .is_ok_and(|elapsed| elapsed >= DISPLAY_DURATION)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
