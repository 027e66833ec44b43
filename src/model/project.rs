//! Projects: the unit that owns events and categories.

use crate::error::{Result, YearClockError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier of a project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        super::string_or_number(deserializer).map(Self)
    }
}

impl ProjectId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is safe to embed in a file name.
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Categories the project was created with.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a project with a fresh id. The name is required.
    pub fn new(name: &str, description: &str, categories: Vec<String>, created_at: DateTime<Utc>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(YearClockError::invalid("project name", "must not be empty"));
        }
        Ok(Self {
            id: ProjectId::generate(),
            name: name.to_string(),
            description: description.trim().to_string(),
            categories,
            created_at,
        })
    }

    /// Whether `key` names this project by id or (case-insensitively) by name.
    pub fn matches(&self, key: &str) -> bool {
        self.id.as_str() == key || self.name.eq_ignore_ascii_case(key.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_requires_name() {
        assert!(Project::new("  ", "", Vec::new(), Utc::now()).is_err());
        let project = Project::new(" Vuosikello ", " kuvaus ", Vec::new(), Utc::now()).unwrap();
        assert_eq!(project.name, "Vuosikello");
        assert_eq!(project.description, "kuvaus");
        assert!(project.id.is_path_safe());
    }

    #[test]
    fn test_project_matches_id_or_name() {
        let project = Project::new("Demo", "", Vec::new(), Utc::now()).unwrap();
        assert!(project.matches(project.id.as_str()));
        assert!(project.matches("demo"));
        assert!(!project.matches("other"));
    }

    #[test]
    fn test_numeric_project_id_decodes() {
        let json = r#"{"id": 1712345678901, "name": "Vanha", "createdAt": "2025-01-01T00:00:00Z"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id.as_str(), "1712345678901");
        assert!(project.id.is_path_safe());
        assert!(!ProjectId::from("../etc").is_path_safe());
    }
}
