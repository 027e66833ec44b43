//! Storage collaborator: where projects, events, categories and reminders live.
//!
//! The layout core never touches storage. The workspace and the reminder
//! service read and write through [`Storage`], so backends can be swapped
//! without touching them.
//!
//! Backends:
//! - [`MemoryStorage`]: hash maps, for tests and demos
//! - [`JsonFileStorage`]: one JSON document per key in a data directory

mod json;
mod memory;

pub use json::JsonFileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;
use crate::model::{Category, Event, Project, ProjectId, Reminder};
use std::sync::Arc;

/// Persistence of everything the app edits.
///
/// Methods take `&self`; backends that hold state guard it themselves so a
/// storage handle can be shared between the workspace and the reminder
/// service.
pub trait Storage {
    /// All projects.
    fn get_projects(&self) -> Result<Vec<Project>>;

    /// Replace the project list, returning what was stored.
    fn save_projects(&self, projects: &[Project]) -> Result<Vec<Project>>;

    /// Events of a project; empty when none are stored.
    fn get_events(&self, project: &ProjectId) -> Result<Vec<Event>>;

    /// Replace the events of a project.
    fn save_events(&self, project: &ProjectId, events: &[Event]) -> Result<()>;

    /// Categories of a project; `None` when nothing is stored yet.
    fn get_categories(&self, project: &ProjectId) -> Result<Option<Vec<Category>>>;

    /// Replace the categories of a project.
    fn save_categories(&self, project: &ProjectId, categories: &[Category]) -> Result<()>;

    /// All pending reminders.
    fn get_reminders(&self) -> Result<Vec<Reminder>>;

    /// Replace the pending reminders.
    fn save_reminders(&self, reminders: &[Reminder]) -> Result<()>;

    /// Remove the events and categories of a project.
    fn delete_project_data(&self, project: &ProjectId) -> Result<()>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get_projects(&self) -> Result<Vec<Project>> {
        (**self).get_projects()
    }

    fn save_projects(&self, projects: &[Project]) -> Result<Vec<Project>> {
        (**self).save_projects(projects)
    }

    fn get_events(&self, project: &ProjectId) -> Result<Vec<Event>> {
        (**self).get_events(project)
    }

    fn save_events(&self, project: &ProjectId, events: &[Event]) -> Result<()> {
        (**self).save_events(project, events)
    }

    fn get_categories(&self, project: &ProjectId) -> Result<Option<Vec<Category>>> {
        (**self).get_categories(project)
    }

    fn save_categories(&self, project: &ProjectId, categories: &[Category]) -> Result<()> {
        (**self).save_categories(project, categories)
    }

    fn get_reminders(&self) -> Result<Vec<Reminder>> {
        (**self).get_reminders()
    }

    fn save_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        (**self).save_reminders(reminders)
    }

    fn delete_project_data(&self, project: &ProjectId) -> Result<()> {
        (**self).delete_project_data(project)
    }
}
