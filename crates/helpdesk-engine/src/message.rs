//! Chat message type.
//!
//! A message is created once and never changed afterwards; the
//! conversation log hands out shared references only.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

/// Format used for message timestamps (e.g. `9:05 AM`).
pub const TIMESTAMP_FORMAT: &str = "%-I:%M %p";

/// A single entry in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    sender: String,
    text: String,
    timestamp: String,
    is_user: bool,
}

impl ChatMessage {
    /// Create a message with an explicit timestamp.
    pub fn new(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
        is_user: bool,
    ) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp: timestamp.into(),
            is_user,
        }
    }

    /// Create a message authored by the user, stamped with the current time.
    pub fn user(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender, text, format_timestamp(&Local::now()), true)
    }

    /// Create a message authored by the support side, stamped with the current time.
    pub fn system(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(sender, text, format_timestamp(&Local::now()), false)
    }

    /// Display name of the author.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Formatted creation time.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Whether the user wrote this message.
    pub fn is_user(&self) -> bool {
        self.is_user
    }
}

/// Format a point in time the way message timestamps are displayed.
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_user_and_system_flags() {
        let user = ChatMessage::user("jdoe", "hello");
        assert!(user.is_user());
        assert_eq!(user.sender(), "jdoe");
        assert_eq!(user.text(), "hello");

        let system = ChatMessage::system("IT Support", "hi");
        assert!(!system.is_user());
        assert!(!system.timestamp().is_empty());
    }

    #[test]
    fn test_timestamp_format() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 4, 9, 5, 0).unwrap();
        assert_eq!(format_timestamp(&morning), "9:05 AM");

        let offset = FixedOffset::east_opt(0).unwrap();
        let evening = offset.with_ymd_and_hms(2024, 3, 4, 17, 30, 0).unwrap();
        assert_eq!(format_timestamp(&evening), "5:30 PM");

        let midnight = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&midnight), "12:00 AM");
    }

    #[test]
    fn test_serializes_fields() {
        let msg = ChatMessage::new("IT Support", "Welcome", "9:00 AM", false);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "IT Support");
        assert_eq!(json["is_user"], false);
    }
}
