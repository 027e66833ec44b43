//! Reminder service: stores reminders and sends the due ones.
//!
//! Delivery goes through a [`Notifier`]. The shell polls
//! [`ReminderService::check_and_send`] from a ticker; a reminder is removed
//! only after it was sent.

use crate::error::Result;
use crate::model::{EventId, Reminder};
use crate::store::Storage;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Delivers reminder messages.
pub trait Notifier {
    /// Send one reminder.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery failed; the reminder is kept and retried.
    fn send(&self, reminder: &Reminder) -> Result<()>;
}

/// Writes reminders to the log instead of sending mail.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, reminder: &Reminder) -> Result<()> {
        log::info!(
            "event=reminder_send module=reminder to={} subject=\"{}\" body=\"{}\"",
            reminder.email,
            reminder.subject(),
            reminder.body()
        );
        Ok(())
    }
}

/// Reminder bookkeeping over a storage backend.
#[derive(Debug)]
pub struct ReminderService<S> {
    storage: S,
}

impl<S: Storage> ReminderService<S> {
    /// Service over `storage`.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Pending reminders.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub fn reminders(&self) -> Result<Vec<Reminder>> {
        self.storage.get_reminders()
    }

    /// Store a reminder, assigning an id when it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn add_reminder(&self, mut reminder: Reminder) -> Result<Reminder> {
        if reminder.id.trim().is_empty() {
            reminder.id = Uuid::new_v4().to_string();
        }
        let mut reminders = self.storage.get_reminders()?;
        reminders.push(reminder.clone());
        self.storage.save_reminders(&reminders)?;
        log::info!(
            "event=reminder_add module=reminder id={} event_id={} at={}",
            reminder.id,
            reminder.event_id,
            reminder.remind_at
        );
        Ok(reminder)
    }

    /// Remove every reminder of an event. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn delete_for_event(&self, event_id: &EventId) -> Result<usize> {
        let mut reminders = self.storage.get_reminders()?;
        let before = reminders.len();
        reminders.retain(|r| &r.event_id != event_id);
        let removed = before - reminders.len();
        if removed > 0 {
            self.storage.save_reminders(&reminders)?;
            log::debug!("event=reminder_delete module=reminder event_id={event_id} count={removed}");
        }
        Ok(removed)
    }

    /// Send every reminder due at `now` and drop the ones that went out.
    ///
    /// A failed send is logged and kept for the next poll. Returns the number
    /// sent.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    pub fn check_and_send(&self, now: DateTime<Utc>, notifier: &dyn Notifier) -> Result<usize> {
        let reminders = self.storage.get_reminders()?;
        let total = reminders.len();
        let mut sent = 0usize;
        let mut kept = Vec::with_capacity(total);
        for reminder in reminders {
            if !reminder.is_due(now) {
                kept.push(reminder);
                continue;
            }
            match notifier.send(&reminder) {
                Ok(()) => sent += 1,
                Err(err) => {
                    log::warn!(
                        "event=reminder_send module=reminder status=failed id={} error=\"{err}\"",
                        reminder.id
                    );
                    kept.push(reminder);
                }
            }
        }
        if sent > 0 {
            self.storage.save_reminders(&kept)?;
        }
        log::debug!("event=reminder_check module=reminder pending={total} sent={sent}");
        Ok(sent)
    }
}
