//! Application configuration, read from TOML.
//!
//! Every field has a default, so a partial file (or none) works:
//!
//! ```toml
//! data_dir = "/home/me/.yearclock/data"
//! stack_order = "start_date"
//!
//! [clock]
//! ring_width = 50.0
//!
//! [theme]
//! accent = "#2196f3"
//! ```

use crate::error::Result;
use crate::layout::{ClockGeometry, StackOrder, TimelineConfig};
use crate::logging::default_log_level;
use crate::terminal::TerminalConfig;
use crate::widget::Theme;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where projects and events are stored.
    pub data_dir: PathBuf,
    /// Where log files go.
    pub log_dir: PathBuf,
    /// `trace`, `debug`, `info`, `warn`, `error` or `off`.
    pub log_level: String,
    /// Project to open, by id or name; the first project when unset.
    pub project: Option<String>,
    /// Year to show first; the current year when unset.
    pub year: Option<i32>,
    /// Stacking order of overlapping events.
    pub stack_order: StackOrder,
    /// Clock dimensions.
    pub clock: ClockGeometry,
    /// Timeline dimensions.
    pub timeline: TimelineConfig,
    /// Terminal session options.
    pub terminal: TerminalConfig,
    /// Seconds between today-indicator refreshes.
    pub today_refresh_secs: u64,
    /// Seconds between reminder checks.
    pub reminder_poll_secs: u64,
    /// Colours.
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = PathBuf::from(".yearclock");
        Self {
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
            log_level: default_log_level().to_string(),
            project: None,
            year: None,
            stack_order: StackOrder::default(),
            clock: ClockGeometry::default(),
            timeline: TimelineConfig::default(),
            terminal: TerminalConfig::default(),
            today_refresh_secs: 60,
            reminder_poll_secs: 60,
            theme: Theme::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::YearClockError::Config`] for invalid TOML or
    /// mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("event=config_load module=config status=ok path={}", path.display());
        Ok(config)
    }

    /// Read `path` if given, else use the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Today refresh period; never shorter than one second.
    pub fn today_refresh(&self) -> Duration {
        Duration::from_secs(self.today_refresh_secs.max(1))
    }

    /// Reminder poll period; never shorter than one second.
    pub fn reminder_poll(&self) -> Duration {
        Duration::from_secs(self.reminder_poll_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;
    use crate::error::YearClockError;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.today_refresh(), Duration::from_secs(60));
        assert_eq!(config.reminder_poll(), Duration::from_secs(60));
        assert_eq!(config.stack_order, StackOrder::Insertion);
        assert!((config.clock.ring_width - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml_str(
            r##"
            year = 2024
            stack_order = "start_date"
            today_refresh_secs = 0

            [clock]
            ring_width = 50.0

            [theme]
            accent = "#112233"
            "##,
        )
        .unwrap();
        assert_eq!(config.year, Some(2024));
        assert_eq!(config.stack_order, StackOrder::StartDate);
        assert!((config.clock.ring_width - 50.0).abs() < f64::EPSILON);
        assert!((config.clock.ring_spacing - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.theme.accent, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(config.theme.text, Theme::default().text);
        assert_eq!(config.today_refresh(), Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("year = \"next\""),
            Err(YearClockError::Config(_))
        ));
        assert!(AppConfig::from_toml_str("[theme]\naccent = \"blue\"").is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("yearclock.toml");
        std::fs::write(&path, "project = \"Demo\"\n").unwrap();
        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.project.as_deref(), Some("Demo"));
        assert!(AppConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
