//! Snapshot: render the demo project's clock and timeline to stdout.
//!
//! Runs without a terminal session and without touching the disk.
//!
//! ```bash
//! cargo run --example snapshot -- 100 36
//! ```

use chrono::{NaiveDate, Utc};
use std::io::Write;
use std::sync::Arc;
use yearclock::buffer::diff::render_lines;
use yearclock::service::{ProjectWorkspace, ReminderService};
use yearclock::store::MemoryStorage;
use yearclock::{sample, App, AppConfig, Buffer, InputEvent, KeyCode};

fn main() -> yearclock::Result<()> {
    let mut args = std::env::args().skip(1).map(|arg| arg.parse::<u16>());
    let width = args.next().and_then(Result::ok).unwrap_or(100);
    let height = args.next().and_then(Result::ok).unwrap_or(36);

    let storage = Arc::new(MemoryStorage::new());
    let project = sample::seed_if_empty(&storage, Utc::now())?
        .ok_or_else(|| yearclock::YearClockError::ProjectNotFound(sample::DEMO_PROJECT_NAME.to_string()))?;
    let workspace = ProjectWorkspace::open(Arc::clone(&storage), project)?;

    let now = NaiveDate::from_ymd_opt(2025, 6, 20)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap_or_default();
    let mut app = App::new(
        workspace,
        ReminderService::new(storage),
        &AppConfig::default(),
        now,
        (width, height),
    );

    let mut stdout = std::io::stdout().lock();
    for key in [KeyCode::F(1), KeyCode::F(2)] {
        app.handle_input(&InputEvent::key(key));
        let mut buffer = Buffer::new(width, height);
        app.render(&mut buffer);

        let mut output = Vec::new();
        render_lines(&buffer, &mut output);
        stdout.write_all(&output)?;
        writeln!(stdout)?;
    }

    let count = app.workspace().events().len();
    writeln!(stdout, "{count} events in {}", app.workspace().project().name)?;
    Ok(())
}
