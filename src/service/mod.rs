//! Services the shell builds on: the open project and its reminders.

pub mod reminder;
pub mod workspace;

pub use reminder::{LogNotifier, Notifier, ReminderService};
pub use workspace::{create_project, delete_project, find_project, ProjectWorkspace};
