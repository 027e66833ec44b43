//! E-mail reminders attached to events.

use super::event::EventId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A reminder to send once `remind_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Identifier; assigned when empty.
    #[serde(default)]
    pub id: String,
    /// The event reminded of.
    pub event_id: EventId,
    /// Event name at the time the reminder was made.
    pub event_name: String,
    /// Event start date.
    pub event_date: NaiveDate,
    /// Recipient address.
    pub email: String,
    /// When to send.
    #[serde(rename = "reminderDateTime")]
    pub remind_at: DateTime<Utc>,
}

impl Reminder {
    /// Whether the reminder should be sent at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.remind_at <= now
    }

    /// `Muistutus: Messut`
    pub fn subject(&self) -> String {
        format!("Muistutus: {}", self.event_name)
    }

    /// Message body with the date in Finnish notation.
    pub fn body(&self) -> String {
        format!(
            "Muistutus tapahtumasta \"{}\" {}.",
            self.event_name,
            self.event_date.format("%-d.%-m.%Y")
        )
    }
}
