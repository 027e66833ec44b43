//! Events: dated, categorized entries in a project.

use super::{category::CategorySet, project::ProjectId};
use crate::error::{Result, YearClockError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier of an event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(String);

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        super::string_or_number(deserializer).map(Self)
    }
}

impl EventId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional importance marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High
    High,
    /// Normal
    Normal,
    /// Low
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        })
    }
}

/// A stored event.
///
/// `start_date <= end_date` holds for every event created through
/// [`EventDraft`]. Documents loaded from storage may violate it; layout
/// skips such records instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Free-form description.
    #[serde(default)]
    pub details: String,
    /// Optional priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// When the event was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_date: Option<DateTime<Utc>>,
    /// Owning project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl Event {
    /// Whether the date range is ordered.
    pub fn is_well_formed(&self) -> bool {
        self.start_date <= self.end_date
    }

    /// Whether `date` falls within the event.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// `1.1.2025 - 10.1.2025`
    pub fn date_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%-d.%-m.%Y"),
            self.end_date.format("%-d.%-m.%Y")
        )
    }

    /// `1.1 - 10.1`
    pub fn short_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%-d.%-m"),
            self.end_date.format("%-d.%-m")
        )
    }
}

/// User input for creating or editing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Display name.
    pub name: String,
    /// Category name; must exist in the project.
    pub category: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Description.
    pub details: String,
    /// Priority.
    pub priority: Option<Priority>,
}

impl EventDraft {
    /// A draft with the required fields and nothing else.
    pub fn new(name: impl Into<String>, category: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            start_date,
            end_date,
            details: String::new(),
            priority: None,
        }
    }

    /// Set the details (builder pattern).
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Set the priority (builder pattern).
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Check required fields, the date order and the category.
    pub fn validate(&self, categories: &CategorySet) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(YearClockError::invalid("name", "must not be empty"));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(YearClockError::invalid("category", "must not be empty"));
        }
        if !categories.contains(category) {
            return Err(YearClockError::UnknownCategory(category.to_string()));
        }
        if self.end_date < self.start_date {
            return Err(YearClockError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Turn a validated draft into an event.
    pub fn into_event(self, id: EventId, project_id: ProjectId, added: DateTime<Utc>) -> Event {
        Event {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            details: self.details,
            priority: self.priority,
            added_date: Some(added),
            project_id: Some(project_id),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_event(id: &str, category: &str, start: (u32, u32), end: (u32, u32)) -> Event {
    let date = |(m, d): (u32, u32)| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
    Event {
        id: EventId::from(id),
        name: format!("event {id}"),
        category: category.to_string(),
        start_date: date(start),
        end_date: date(end),
        details: String::new(),
        priority: None,
        added_date: None,
        project_id: None,
    }
}
