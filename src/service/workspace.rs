//! Project workspace: the events and categories of one open project.
//!
//! Every mutation is written through to storage before it returns. The
//! category visibility filter is view state and is not persisted.

use crate::error::{Result, YearClockError};
use crate::model::query::{self, DEFAULT_RESULT_LIMIT};
use crate::model::{Category, CategorySet, Event, EventDraft, EventId, Project, ProjectId, DEFAULT_CATEGORIES};
use crate::store::Storage;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// An open project.
#[derive(Debug)]
pub struct ProjectWorkspace<S> {
    storage: S,
    project: Project,
    events: Vec<Event>,
    categories: CategorySet,
    selected: BTreeSet<String>,
}

impl<S: Storage> ProjectWorkspace<S> {
    /// Load a project's events and categories.
    ///
    /// Categories fall back to the project's own list, then to
    /// [`DEFAULT_CATEGORIES`]; the fallback is stored right away. All
    /// categories start out visible.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    pub fn open(storage: S, project: Project) -> Result<Self> {
        let categories = match storage.get_categories(&project.id)? {
            Some(stored) => CategorySet::from_categories(stored),
            None => {
                let set = if project.categories.is_empty() {
                    CategorySet::from_names(DEFAULT_CATEGORIES)
                } else {
                    CategorySet::from_names(&project.categories)
                };
                storage.save_categories(&project.id, set.as_slice())?;
                log::info!(
                    "event=categories_seed module=workspace project={} count={}",
                    project.id,
                    set.len()
                );
                set
            }
        };
        let events = storage.get_events(&project.id)?;
        let selected = categories.names().map(String::from).collect();
        log::info!(
            "event=project_open module=workspace project={} events={} categories={}",
            project.id,
            events.len(),
            categories.len()
        );
        Ok(Self {
            storage,
            project,
            events,
            categories,
            selected,
        })
    }

    /// The open project.
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Storage handle.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// All events, in stored order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The project's categories.
    pub const fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Names of the visible categories.
    pub const fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// Look up an event.
    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    fn persist_events(&self) -> Result<()> {
        self.storage.save_events(&self.project.id, &self.events)
    }

    fn persist_categories(&self) -> Result<()> {
        self.storage.save_categories(&self.project.id, self.categories.as_slice())
    }

    /// Validate and add an event with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or an error if storage fails.
    pub fn add_event(&mut self, draft: EventDraft, now: DateTime<Utc>) -> Result<&Event> {
        draft.validate(&self.categories)?;
        let event = draft.into_event(EventId::generate(), self.project.id.clone(), now);
        log::info!(
            "event=event_add module=workspace project={} id={} category={}",
            self.project.id,
            event.id,
            event.category
        );
        self.events.push(event);
        self.persist_events()?;
        let last = self.events.len() - 1;
        Ok(&self.events[last])
    }

    /// Replace the fields of an event, keeping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`YearClockError::EventNotFound`], a validation error, or an
    /// error if storage fails.
    pub fn update_event(&mut self, id: &EventId, draft: EventDraft) -> Result<&Event> {
        draft.validate(&self.categories)?;
        let position = self
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| YearClockError::EventNotFound(id.to_string()))?;
        let old = &self.events[position];
        let added = old.added_date.unwrap_or_else(Utc::now);
        let project_id = old.project_id.clone().unwrap_or_else(|| self.project.id.clone());
        self.events[position] = draft.into_event(id.clone(), project_id, added);
        self.persist_events()?;
        log::info!("event=event_update module=workspace project={} id={id}", self.project.id);
        Ok(&self.events[position])
    }

    /// Remove an event. Its reminders are the caller's to delete.
    ///
    /// # Errors
    ///
    /// Returns [`YearClockError::EventNotFound`] or a storage error.
    pub fn delete_event(&mut self, id: &EventId) -> Result<Event> {
        let position = self
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| YearClockError::EventNotFound(id.to_string()))?;
        let removed = self.events.remove(position);
        self.persist_events()?;
        log::info!("event=event_delete module=workspace project={} id={id}", self.project.id);
        Ok(removed)
    }

    /// Add a category; it starts out visible.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank or duplicate name, when the project is
    /// at [`crate::model::MAX_CATEGORIES`], or if storage fails.
    pub fn add_category(&mut self, name: &str) -> Result<&Category> {
        let name = self.categories.add(name)?.name.clone();
        self.persist_categories()?;
        log::info!("event=category_add module=workspace project={} name={name}", self.project.id);
        self.selected.insert(name.clone());
        self.categories
            .get(&name)
            .ok_or(YearClockError::UnknownCategory(name))
    }

    /// Remove a category and every event in it. Returns the removed events.
    ///
    /// # Errors
    ///
    /// Returns [`YearClockError::UnknownCategory`] or a storage error.
    pub fn remove_category(&mut self, name: &str) -> Result<Vec<Event>> {
        self.categories.remove(name)?;
        self.selected.remove(name);
        let (removed, kept): (Vec<Event>, Vec<Event>) =
            std::mem::take(&mut self.events).into_iter().partition(|e| e.category == name);
        self.events = kept;
        self.persist_categories()?;
        self.persist_events()?;
        log::info!(
            "event=category_remove module=workspace project={} name={name} events_removed={}",
            self.project.id,
            removed.len()
        );
        Ok(removed)
    }

    /// Rename a category and the events in it. The colour is kept.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown old name, a blank or duplicate new
    /// name, or if storage fails.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<()> {
        self.categories.rename(old, new)?;
        let new = new.trim();
        let mut changed = 0usize;
        for event in self.events.iter_mut().filter(|e| e.category == old) {
            event.category = new.to_string();
            changed += 1;
        }
        if self.selected.remove(old) {
            self.selected.insert(new.to_string());
        }
        self.persist_categories()?;
        if changed > 0 {
            self.persist_events()?;
        }
        log::info!(
            "event=category_rename module=workspace project={} from={old} to={new} events={changed}",
            self.project.id
        );
        Ok(())
    }

    /// Flip the visibility of a category. Returns whether it is now visible;
    /// unknown names are ignored.
    pub fn toggle_category(&mut self, name: &str) -> bool {
        if !self.categories.contains(name) {
            return false;
        }
        if self.selected.remove(name) {
            false
        } else {
            self.selected.insert(name.to_string());
            true
        }
    }

    /// Make every category visible.
    pub fn show_all_categories(&mut self) {
        self.selected = self.categories.names().map(String::from).collect();
    }

    /// Hide every category.
    pub fn hide_all_categories(&mut self) {
        self.selected.clear();
    }

    /// Events matching `term` by name or category, at most
    /// [`DEFAULT_RESULT_LIMIT`].
    pub fn search(&self, term: &str) -> Vec<&Event> {
        query::search(&self.events, term, DEFAULT_RESULT_LIMIT)
    }

    /// Every event matching `term` by name, details or category, by start date.
    ///
    /// A blank term lists all events.
    pub fn filter(&self, term: &str) -> Vec<&Event> {
        query::filter(&self.events, term)
    }

    /// The `limit` most recently added events.
    pub fn recent(&self, limit: usize) -> Vec<&Event> {
        query::recent(&self.events, limit)
    }

    /// Events starting or ending in `month0` of `year`.
    pub fn month_agenda(&self, year: i32, month0: u32) -> Vec<&Event> {
        query::month_agenda(&self.events, year, month0)
    }

    /// Years with events, plus `current_year`.
    pub fn available_years(&self, current_year: i32) -> Vec<i32> {
        query::available_years(&self.events, current_year)
    }
}

/// Create and store a new project.
///
/// # Errors
///
/// Returns an error for a blank name or if storage fails.
pub fn create_project<S: Storage>(
    storage: &S,
    name: &str,
    description: &str,
    categories: Vec<String>,
    now: DateTime<Utc>,
) -> Result<Project> {
    let project = Project::new(name, description, categories, now)?;
    let mut projects = storage.get_projects()?;
    projects.push(project.clone());
    storage.save_projects(&projects)?;
    log::info!("event=project_create module=workspace id={} name={}", project.id, project.name);
    Ok(project)
}

/// Delete a project together with its events and categories.
///
/// # Errors
///
/// Returns [`YearClockError::ProjectNotFound`] or a storage error.
pub fn delete_project<S: Storage>(storage: &S, id: &ProjectId) -> Result<Project> {
    let mut projects = storage.get_projects()?;
    let position = projects
        .iter()
        .position(|p| &p.id == id)
        .ok_or_else(|| YearClockError::ProjectNotFound(id.to_string()))?;
    let removed = projects.remove(position);
    storage.save_projects(&projects)?;
    storage.delete_project_data(id)?;
    log::info!("event=project_delete module=workspace id={id}");
    Ok(removed)
}

/// Find a project by id or name (case-insensitive).
///
/// # Errors
///
/// Returns [`YearClockError::ProjectNotFound`] or a storage error.
pub fn find_project<S: Storage>(storage: &S, key: &str) -> Result<Project> {
    storage
        .get_projects()?
        .into_iter()
        .find(|p| p.matches(key))
        .ok_or_else(|| YearClockError::ProjectNotFound(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::test_event;
    use crate::store::MemoryStorage;
    use chrono::{NaiveDate, TimeZone};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn workspace() -> ProjectWorkspace<MemoryStorage> {
        let storage = MemoryStorage::new();
        let project = create_project(&storage, "Demo", "", Vec::new(), Utc::now()).unwrap();
        ProjectWorkspace::open(storage, project).unwrap()
    }

    #[test]
    fn test_open_seeds_default_categories() {
        let ws = workspace();
        assert_eq!(ws.categories().names().collect::<Vec<_>>(), DEFAULT_CATEGORIES.to_vec());
        assert_eq!(ws.selected_categories().len(), 4);
        let stored = ws.storage().get_categories(&ws.project().id).unwrap().unwrap();
        assert_eq!(stored.len(), 4);
    }

    #[test]
    fn test_open_prefers_project_categories() {
        let storage = MemoryStorage::new();
        let project = create_project(&storage, "Oma", "", vec!["A".into(), "B".into()], Utc::now()).unwrap();
        let ws = ProjectWorkspace::open(storage, project).unwrap();
        assert_eq!(ws.categories().sorted_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_add_update_delete_event_persist() {
        let mut ws = workspace();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let id = ws
            .add_event(EventDraft::new("Messut", "Markkinointi", date(3, 1), date(3, 3)), now)
            .unwrap()
            .id
            .clone();
        assert_eq!(ws.storage().get_events(&ws.project().id).unwrap().len(), 1);

        let updated = ws
            .update_event(&id, EventDraft::new("Messut 2", "Talous", date(3, 2), date(3, 4)))
            .unwrap();
        assert_eq!(updated.name, "Messut 2");
        assert_eq!(updated.added_date, Some(now));

        ws.delete_event(&id).unwrap();
        assert!(ws.storage().get_events(&ws.project().id).unwrap().is_empty());
        assert!(matches!(ws.delete_event(&id), Err(YearClockError::EventNotFound(_))));
    }

    #[test]
    fn test_add_event_validates() {
        let mut ws = workspace();
        let inverted = EventDraft::new("x", "Talous", date(3, 5), date(3, 1));
        assert!(matches!(
            ws.add_event(inverted, Utc::now()),
            Err(YearClockError::InvalidDateRange { .. })
        ));
        let unknown = EventDraft::new("x", "Muu", date(3, 1), date(3, 1));
        assert!(matches!(ws.add_event(unknown, Utc::now()), Err(YearClockError::UnknownCategory(_))));
        assert!(ws.events().is_empty());
    }

    #[test]
    fn test_category_limit_and_duplicates() {
        let mut ws = workspace();
        ws.add_category("Tuotanto").unwrap();
        assert!(ws.selected_categories().contains("Tuotanto"));
        assert!(matches!(ws.add_category("Talous"), Err(YearClockError::DuplicateCategory(_))));
        assert!(matches!(ws.add_category("Kuudes"), Err(YearClockError::CategoryLimit { max: 5 })));
    }

    #[test]
    fn test_remove_category_cascades_and_keeps_colours() {
        let mut ws = workspace();
        let talous = ws.categories().color_of("Talous");
        ws.add_event(EventDraft::new("a", "Markkinointi", date(1, 1), date(1, 2)), Utc::now())
            .unwrap();
        ws.add_event(EventDraft::new("b", "Talous", date(1, 1), date(1, 2)), Utc::now())
            .unwrap();

        let removed = ws.remove_category("Markkinointi").unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(ws.events().len(), 1);
        assert_eq!(ws.categories().color_of("Talous"), talous);
        assert!(!ws.selected_categories().contains("Markkinointi"));
        assert_eq!(ws.storage().get_events(&ws.project().id).unwrap().len(), 1);
    }

    #[test]
    fn test_rename_category_cascades() {
        let mut ws = workspace();
        let colour = ws.categories().color_of("Talous");
        ws.add_event(EventDraft::new("b", "Talous", date(1, 1), date(1, 2)), Utc::now())
            .unwrap();
        ws.rename_category("Talous", " Raha ").unwrap();
        assert_eq!(ws.events()[0].category, "Raha");
        assert_eq!(ws.categories().color_of("Raha"), colour);
        assert!(ws.selected_categories().contains("Raha"));
    }

    #[test]
    fn test_visibility_toggles() {
        let mut ws = workspace();
        assert!(!ws.toggle_category("Talous"));
        assert!(!ws.selected_categories().contains("Talous"));
        assert!(ws.toggle_category("Talous"));
        assert!(!ws.toggle_category("Muu"));
        ws.hide_all_categories();
        assert!(ws.selected_categories().is_empty());
        ws.show_all_categories();
        assert_eq!(ws.selected_categories().len(), 4);
    }

    #[test]
    fn test_queries() {
        let storage = MemoryStorage::new();
        let project = create_project(&storage, "Demo", "", Vec::new(), Utc::now()).unwrap();
        let events: Vec<Event> = (0..8)
            .map(|i| test_event(&i.to_string(), "Talous", (i + 1, 1), (i + 1, 2)))
            .collect();
        storage.save_events(&project.id, &events).unwrap();
        let ws = ProjectWorkspace::open(storage, project).unwrap();

        assert_eq!(ws.search("TALOUS").len(), DEFAULT_RESULT_LIMIT);
        assert_eq!(ws.filter("TALOUS").len(), 8);
        assert_eq!(ws.filter("").len(), 8);
        assert_eq!(ws.month_agenda(2025, 2).len(), 1);
        assert_eq!(ws.available_years(2030), vec![2025, 2030]);
        assert_eq!(ws.recent(3).len(), 3);
    }

    #[test]
    fn test_delete_project_removes_data() {
        let storage = MemoryStorage::new();
        let project = create_project(&storage, "Demo", "", Vec::new(), Utc::now()).unwrap();
        storage
            .save_events(&project.id, &[test_event("1", "Talous", (1, 1), (1, 1))])
            .unwrap();
        assert_eq!(find_project(&storage, "demo").unwrap().id, project.id);

        delete_project(&storage, &project.id).unwrap();
        assert!(storage.get_projects().unwrap().is_empty());
        assert!(storage.get_events(&project.id).unwrap().is_empty());
        assert!(matches!(find_project(&storage, "demo"), Err(YearClockError::ProjectNotFound(_))));
    }

    #[test]
    fn test_create_project_requires_name() {
        let storage = MemoryStorage::new();
        assert!(create_project(&storage, " ", "", Vec::new(), Utc::now()).is_err());
        assert!(storage.get_projects().unwrap().is_empty());
    }
}
