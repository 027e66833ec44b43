//! JSON file storage: one document per key in a data directory.
//!
//! ```text
//! <data dir>/
//!   projects.json
//!   events_<project id>.json
//!   categories_<project id>.json
//!   reminders.json
//! ```
//!
//! Writes go to a temporary file that is renamed over the target, so a
//! crash mid-write leaves the previous document intact.

use super::Storage;
use crate::error::{Result, YearClockError};
use crate::model::{Category, Event, Project, ProjectId, Reminder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stored category: legacy documents hold bare names.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCategory {
    Name(String),
    Full(Category),
}

/// Storage in a directory of JSON documents.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Use `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("event=storage_open module=store path={}", dir.display());
        Ok(Self { dir })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn project_file(&self, prefix: &str, project: &ProjectId) -> Result<PathBuf> {
        if !project.is_path_safe() {
            return Err(YearClockError::invalid("project id", format!("`{project}` cannot be used in a file name")));
        }
        Ok(self.dir.join(format!("{prefix}_{}.json", project.as_str())))
    }

    fn read_document<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_document<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        log::debug!(
            "event=storage_write module=store path={} bytes={}",
            path.display(),
            bytes.len()
        );
        Ok(())
    }

    fn remove_document(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Storage for JsonFileStorage {
    fn get_projects(&self) -> Result<Vec<Project>> {
        Ok(self.read_document(&self.dir.join("projects.json"))?.unwrap_or_default())
    }

    fn save_projects(&self, projects: &[Project]) -> Result<Vec<Project>> {
        self.write_document(&self.dir.join("projects.json"), projects)?;
        Ok(projects.to_vec())
    }

    /// Records that do not decode are logged and skipped.
    fn get_events(&self, project: &ProjectId) -> Result<Vec<Event>> {
        let path = self.project_file("events", project)?;
        let raw: Vec<serde_json::Value> = self.read_document(&path)?.unwrap_or_default();
        let total = raw.len();
        let events: Vec<Event> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<Event>(value) {
                Ok(event) => Some(event),
                Err(err) => {
                    log::warn!(
                        "event=malformed_event module=store status=skipped project={project} index={index} error=\"{err}\""
                    );
                    None
                }
            })
            .collect();
        log::debug!(
            "event=events_load module=store project={project} loaded={} skipped={}",
            events.len(),
            total - events.len()
        );
        Ok(events)
    }

    fn save_events(&self, project: &ProjectId, events: &[Event]) -> Result<()> {
        self.write_document(&self.project_file("events", project)?, events)
    }

    fn get_categories(&self, project: &ProjectId) -> Result<Option<Vec<Category>>> {
        let stored: Option<Vec<StoredCategory>> = self.read_document(&self.project_file("categories", project)?)?;
        Ok(stored.map(|stored| {
            stored
                .into_iter()
                .enumerate()
                .map(|(position, category)| match category {
                    StoredCategory::Name(name) => Category {
                        name,
                        insertion_index: position,
                    },
                    StoredCategory::Full(category) => category,
                })
                .collect()
        }))
    }

    fn save_categories(&self, project: &ProjectId, categories: &[Category]) -> Result<()> {
        self.write_document(&self.project_file("categories", project)?, categories)
    }

    fn get_reminders(&self) -> Result<Vec<Reminder>> {
        Ok(self.read_document(&self.dir.join("reminders.json"))?.unwrap_or_default())
    }

    fn save_reminders(&self, reminders: &[Reminder]) -> Result<()> {
        self.write_document(&self.dir.join("reminders.json"), reminders)
    }

    fn delete_project_data(&self, project: &ProjectId) -> Result<()> {
        Self::remove_document(&self.project_file("events", project)?)?;
        Self::remove_document(&self.project_file("categories", project)?)?;
        log::info!("event=project_data_delete module=store project={project}");
        Ok(())
    }
}
