//! Outbound notification channel abstraction.
//!
//! The engine only ever performs one outbound call: `send(destination, note)`.
//! [`NotificationChannel`] keeps that seam narrow so the daily scan can run
//! against the real ntfy transport in production and against a recording stub
//! in tests. Delivery is fire-and-forget; callers log a failed send and move
//! on, there is no queue and no retry.

pub mod ntfy;

use async_trait::async_trait;

use crate::errors::Result;

pub use ntfy::NtfyChannel;

/// Notification priority, mirroring the ntfy priority levels the engine uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Normal delivery
    #[default]
    Default,
    /// Raised delivery (sound/vibration on most clients)
    High,
    /// Maximum delivery, reserved for payments due within a day
    Urgent,
}

impl Priority {
    /// The wire value for the `Priority` header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// One notification, ready for delivery to a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline, shown as the push title
    pub title: String,
    /// Message body
    pub body: String,
    /// Delivery priority
    pub priority: Priority,
    /// Comma-separated ntfy tags (emoji short codes)
    pub tags: String,
}

/// Where notifications go. Implemented by the real ntfy transport and by the
/// test doubles.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers one notification to `destination`.
    async fn send(&self, destination: &str, note: &Notification) -> Result<()>;
}

/// Composes the delivery URL for a user's topic.
///
/// An unset or empty per-user server falls back to `default_server`; a single
/// trailing slash on the base is stripped before the topic is appended.
#[must_use]
pub fn destination(server: Option<&str>, default_server: &str, topic: &str) -> String {
    let base = match server {
        Some(url) if !url.is_empty() => url,
        _ => default_server,
    };
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}/{topic}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::DEFAULT_NTFY_SERVER;

    #[test]
    fn test_destination_default_server() {
        assert_eq!(
            destination(None, DEFAULT_NTFY_SERVER, "my-alerts"),
            "https://ntfy.sh/my-alerts"
        );
    }

    #[test]
    fn test_destination_custom_server_strips_trailing_slash() {
        assert_eq!(
            destination(
                Some("https://push.example.com/"),
                DEFAULT_NTFY_SERVER,
                "cards"
            ),
            "https://push.example.com/cards"
        );
        assert_eq!(
            destination(
                Some("https://push.example.com"),
                DEFAULT_NTFY_SERVER,
                "cards"
            ),
            "https://push.example.com/cards"
        );
    }

    #[test]
    fn test_destination_empty_server_falls_back() {
        assert_eq!(
            destination(Some(""), DEFAULT_NTFY_SERVER, "cards"),
            "https://ntfy.sh/cards"
        );
    }

    #[test]
    fn test_priority_wire_values() {
        assert_eq!(Priority::Default.as_str(), "default");
        assert_eq!(Priority::High.as_str(), "high");
        assert_eq!(Priority::Urgent.as_str(), "urgent");
    }
}
