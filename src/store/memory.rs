//! In-memory storage.

use super::Storage;
use crate::error::Result;
use crate::model::{Category, Event, Project, ProjectId, Reminder};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Tables {
    projects: Vec<Project>,
    events: HashMap<ProjectId, Vec<Event>>,
    categories: HashMap<ProjectId, Vec<Category>>,
    reminders: Vec<Reminder>,
}

/// Storage backed by hash maps; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // Every write is a single assignment, so a poisoned lock still
        // guards whole tables.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.tables().projects.clone())
    }

    fn save_projects(&self, projects: &[Project]) -> Result<Vec<Project>> {
        self.tables().projects = projects.to_vec();
        Ok(projects.to_vec())
    }

    fn get_events(&self, project: &ProjectId) -> Result<Vec<Event>> {
        Ok(self.tables().events.get(project).cloned().unwrap_or_default())
    }

    fn save_events(&self, project: &ProjectId, events: &[Event]) -> Result<()> {
        self.tables().events.insert(project.clone(), events.to_vec());
        Ok(())
    }

    fn get_categories(&self, project: &ProjectId) -> Result<Option<Vec<Category>>> {
        Ok(self.tables().categories.get(project).cloned())
    }

    fn save_categories(&self, project: &ProjectId, categories: &[Category]) -> Result<()> {
        self.tables().categories.insert(project.clone(), categories.to_vec());
        Ok(())
    }

    fn get_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.tables().reminders.clone())
    }

    fn save_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        self.tables().reminders = reminders.to_vec();
        Ok(())
    }

    fn delete_project_data(&self, project: &ProjectId) -> Result<()> {
        let mut tables = self.tables();
        tables.events.remove(project);
        tables.categories.remove(project);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::test_event;

    #[test]
    fn test_categories_absent_until_saved() {
        let storage = MemoryStorage::new();
        let id = ProjectId::from("p");
        assert_eq!(storage.get_categories(&id).unwrap(), None);

        let stored = vec![Category {
            name: "Talous".into(),
            insertion_index: 3,
        }];
        storage.save_categories(&id, &stored).unwrap();
        assert_eq!(storage.get_categories(&id).unwrap(), Some(stored));
    }

    #[test]
    fn test_delete_project_data() {
        let storage = MemoryStorage::new();
        let id = ProjectId::from("p");
        let other = ProjectId::from("q");
        let events = vec![test_event("1", "Talous", (1, 1), (1, 2))];
        storage.save_events(&id, &events).unwrap();
        storage.save_events(&other, &events).unwrap();
        storage.save_categories(&id, &[]).unwrap();

        storage.delete_project_data(&id).unwrap();
        assert!(storage.get_events(&id).unwrap().is_empty());
        assert_eq!(storage.get_categories(&id).unwrap(), None);
        assert_eq!(storage.get_events(&other).unwrap(), events);
    }
}
