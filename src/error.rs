//! Error types for yearclock.
//!
//! Data-shape problems found while laying out a frame are not errors; they
//! are reported as [`crate::layout::LayoutIssue`] and the frame still renders.

use thiserror::Error;

/// Result type for yearclock operations.
pub type Result<T> = std::result::Result<T, YearClockError>;

/// Errors raised by storage, validation, configuration and the terminal.
#[derive(Error, Debug)]
pub enum YearClockError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A user-supplied field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Field name as shown to the user.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An event ends before it starts.
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        /// Start date.
        start: chrono::NaiveDate,
        /// End date.
        end: chrono::NaiveDate,
    },

    /// The year span used for projection is empty or inverted.
    #[error("year span must end after it starts ({start}..{end})")]
    InvalidSpan {
        /// Span start.
        start: chrono::NaiveDate,
        /// Span end.
        end: chrono::NaiveDate,
    },

    /// A project already holds the maximum number of categories.
    #[error("a project can have at most {max} categories")]
    CategoryLimit {
        /// The limit.
        max: usize,
    },

    /// A category with this name already exists.
    #[error("category `{0}` already exists")]
    DuplicateCategory(String),

    /// The category is not defined in this project.
    #[error("unknown category `{0}`")]
    UnknownCategory(String),

    /// No event with this id.
    #[error("event `{0}` not found")]
    EventNotFound(String),

    /// No project with this id or name.
    #[error("project `{0}` not found")]
    ProjectNotFound(String),

    /// Logging backend could not be started.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// The terminal could not be prepared or written.
    #[error("terminal unavailable: {0}")]
    Terminal(String),
}

impl YearClockError {
    /// Shorthand for [`YearClockError::InvalidField`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            YearClockError::invalid("name", "must not be empty").to_string(),
            "invalid name: must not be empty"
        );
        assert_eq!(
            YearClockError::CategoryLimit { max: 5 }.to_string(),
            "a project can have at most 5 categories"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn read() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(read(), Err(YearClockError::Io(_))));
    }
}
