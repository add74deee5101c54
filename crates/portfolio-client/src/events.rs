//! Application-wide notifications raised by the client.
//!
//! Implementations are injected when the client is built, so whoever owns
//! the session state (for example an auth context that clears the current
//! user and shows a login view) reacts without a global event bus.

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
}

/// Toast-style notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
}

impl Notification {
    /// Success notification.
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notification.
    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Hooks the client calls when something outside the immediate call site
/// must react.
pub trait ClientEvents: Send + Sync {
    /// A session refresh failed; the user must log in again. Raised once
    /// per failed refresh, however many requests were waiting on it.
    fn session_expired(&self) {}

    /// A contact message was marked read.
    fn message_read(&self, _message_id: &str) {}

    /// A component asked for a notification to be shown.
    fn notify(&self, _notification: Notification) {}
}

/// Events sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpClientEvents;

impl ClientEvents for NoOpClientEvents {}
