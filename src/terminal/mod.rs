//! Terminal session: raw mode, alternate screen and frame output.
//!
//! [`Terminal`] owns stdout for the lifetime of the UI. Frames are drawn
//! into a [`Screen`] and flushed as one minimal ANSI diff per pass. Dropping
//! the session restores the terminal, including on early returns.

mod screen;

pub use screen::{RenderStats, Screen};

use crate::buffer::diff::DiffResult;
use crate::buffer::Buffer;
use crate::error::{Result, YearClockError};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use serde::{Deserialize, Serialize};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Configuration for the terminal session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Input poll timeout.
    #[serde(with = "millis")]
    pub input_poll_timeout: Duration,
    /// Whether to enable mouse capture.
    pub enable_mouse: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(50),
            enable_mouse: true,
            alternate_screen: true,
        }
    }
}

/// Durations as integer milliseconds in config files.
pub(crate) mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

fn terminal_error(err: io::Error) -> YearClockError {
    YearClockError::Terminal(err.to_string())
}

/// Restore the terminal before the panic message is printed.
///
/// Release builds abort on panic, so [`Terminal`]'s `Drop` never runs there.
/// Install once, before the session starts.
pub fn install_restore_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        previous(info);
    }));
}

/// An interactive terminal session.
pub struct Terminal {
    config: TerminalConfig,
    screen: Screen,
    stdout: Stdout,
}

impl Terminal {
    /// Enter raw mode and prepare the screen.
    ///
    /// # Errors
    ///
    /// Returns [`YearClockError::Terminal`] if the terminal size cannot be
    /// read or raw mode cannot be entered, e.g. when stdout is not a tty.
    pub fn new(config: TerminalConfig) -> Result<Self> {
        let (width, height) = terminal::size().map_err(terminal_error)?;
        terminal::enable_raw_mode().map_err(terminal_error)?;

        // From here on Drop restores whatever was switched on.
        let mut session = Self {
            config,
            screen: Screen::new(width, height),
            stdout: io::stdout(),
        };
        if session.config.alternate_screen {
            execute!(session.stdout, EnterAlternateScreen).map_err(terminal_error)?;
        }
        if session.config.enable_mouse {
            execute!(session.stdout, EnableMouseCapture).map_err(terminal_error)?;
        }
        execute!(session.stdout, cursor::Hide).map_err(terminal_error)?;

        log::info!(
            "event=terminal_open module=terminal status=ok width={width} height={height} mouse={}",
            session.config.enable_mouse
        );
        Ok(session)
    }

    /// Session configuration.
    pub const fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Current size as (columns, rows).
    pub const fn size(&self) -> (u16, u16) {
        (self.screen.width(), self.screen.height())
    }

    /// Statistics of the frames presented so far.
    pub const fn stats(&self) -> RenderStats {
        self.screen.stats()
    }

    /// Adopt a new terminal size; the next frame is a full redraw.
    pub fn resize(&mut self, width: u16, height: u16) {
        log::debug!("event=terminal_resize module=terminal width={width} height={height}");
        self.screen.resize(width, height);
    }

    /// Force the next frame to be a full redraw.
    pub fn invalidate(&mut self) {
        self.screen.mark_full_dirty();
    }

    /// Draw a frame and flush it in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn draw<F>(&mut self, draw: F) -> Result<DiffResult>
    where
        F: FnOnce(&mut Buffer),
    {
        let (bytes, result) = self.screen.present(draw);
        if !bytes.is_empty() {
            self.stdout.write_all(bytes).map_err(terminal_error)?;
            self.stdout.flush().map_err(terminal_error)?;
        }
        Ok(result)
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("config", &self.config)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(self.stdout, cursor::Show);
        if self.config.enable_mouse {
            let _ = execute!(self.stdout, DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(self.stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        let stats = self.screen.stats();
        log::info!(
            "event=terminal_close module=terminal frames={} full_redraws={} bytes={} avg_us={}",
            stats.frames,
            stats.full_redraws,
            stats.bytes_written,
            stats.avg_render_us
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_and_toml() {
        let config = TerminalConfig::default();
        assert!(config.enable_mouse);
        assert_eq!(config.input_poll_timeout, Duration::from_millis(50));

        let parsed: TerminalConfig = toml::from_str("input_poll_timeout = 20\nenable_mouse = false").unwrap();
        assert_eq!(parsed.input_poll_timeout, Duration::from_millis(20));
        assert!(!parsed.enable_mouse);
        assert!(parsed.alternate_screen);
    }

    #[test]
    fn test_io_error_maps_to_terminal() {
        let err = terminal_error(io::Error::new(io::ErrorKind::Other, "not a tty"));
        assert!(matches!(err, YearClockError::Terminal(ref msg) if msg == "not a tty"));
    }
}
