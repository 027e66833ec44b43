//! Terminal year clock.
//!
//! # Usage
//!
//! ```bash
//! # Open the first project in ./.yearclock/data
//! yearclock
//!
//! # Open a project by name and show 2026
//! yearclock --project Vuosikello --year 2026
//!
//! # Print one frame of the timeline and exit
//! yearclock --snapshot 120x40 --tab timeline
//! ```

use chrono::{Local, Utc};
use clap::{Parser, ValueEnum};
use crossbeam_channel::{bounded, select};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use yearclock::actor::{InputActor, InputEvent, KeyCode, TickerActor};
use yearclock::buffer::diff::render_lines;
use yearclock::error::{Result, YearClockError};
use yearclock::service::{find_project, LogNotifier, ProjectWorkspace, ReminderService};
use yearclock::store::{JsonFileStorage, Storage};
use yearclock::terminal::{install_restore_hook, Terminal};
use yearclock::{init_logging, sample, App, AppConfig, Buffer};

/// Radial year clock and timeline for the terminal
#[derive(Parser, Debug)]
#[command(name = "yearclock")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding projects, events and categories
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Project to open, by id or name
    #[arg(short, long)]
    project: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Year to show first
    #[arg(short, long)]
    year: Option<i32>,

    /// trace, debug, info, warn, error or off
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rotated log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Render one frame of the given size to stdout and exit
    #[arg(long, value_name = "COLSxROWS", value_parser = parse_size)]
    snapshot: Option<(u16, u16)>,

    /// View to open
    #[arg(long, value_enum, default_value_t = StartTab::Clock)]
    tab: StartTab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StartTab {
    Clock,
    Timeline,
    Agenda,
    List,
}

impl StartTab {
    const fn key(self) -> KeyCode {
        match self {
            Self::Clock => KeyCode::F(1),
            Self::Timeline => KeyCode::F(2),
            Self::Agenda => KeyCode::F(3),
            Self::List => KeyCode::F(4),
        }
    }
}

fn parse_size(value: &str) -> std::result::Result<(u16, u16), String> {
    let (cols, rows) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected COLSxROWS, got `{value}`"))?;
    let parse = |part: &str| part.trim().parse::<u16>().map_err(|err| format!("`{part}`: {err}"));
    let size = (parse(cols)?, parse(rows)?);
    if size.0 == 0 || size.1 < 2 {
        return Err(format!("`{value}` is too small"));
    }
    Ok(size)
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(dir) = &args.log_dir {
        config.log_dir.clone_from(dir);
    }
    if let Some(level) = &args.log_level {
        config.log_level.clone_from(level);
    }
    if args.project.is_some() {
        config.project.clone_from(&args.project);
    }
    if args.year.is_some() {
        config.year = args.year;
    }
    Ok(config)
}

fn open_app(config: &AppConfig, size: (u16, u16)) -> Result<App<Arc<JsonFileStorage>>> {
    let storage = Arc::new(JsonFileStorage::open(&config.data_dir)?);
    if let Some(project) = sample::seed_if_empty(&storage, Utc::now())? {
        log::info!("event=sample_seed module=main project={}", project.id);
    }
    let project = match &config.project {
        Some(key) => find_project(&storage, key)?,
        None => storage
            .get_projects()?
            .into_iter()
            .next()
            .ok_or_else(|| YearClockError::ProjectNotFound("(none)".to_string()))?,
    };
    let workspace = ProjectWorkspace::open(Arc::clone(&storage), project)?;
    let reminders = ReminderService::new(storage);
    Ok(App::new(workspace, reminders, config, Local::now().naive_local(), size))
}

fn snapshot(config: &AppConfig, tab: StartTab, (cols, rows): (u16, u16)) -> Result<()> {
    let mut app = open_app(config, (cols, rows))?;
    app.handle_input(&InputEvent::key(tab.key()));
    let mut buffer = Buffer::new(cols, rows);
    app.render(&mut buffer);

    let mut output = Vec::with_capacity(buffer.len() * 4);
    render_lines(&buffer, &mut output);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}

fn run_interactive(config: &AppConfig, tab: StartTab) -> Result<()> {
    install_restore_hook();
    let mut terminal = Terminal::new(config.terminal.clone())?;
    let mut app = open_app(config, terminal.size())?;
    app.handle_input(&InputEvent::key(tab.key()));

    let (input_tx, input_rx) = bounded::<InputEvent>(256);
    let input = InputActor::spawn(input_tx, config.terminal.input_poll_timeout)?;
    let today = TickerActor::spawn("today", config.today_refresh())?;
    let reminder_tick = TickerActor::spawn("reminders", config.reminder_poll())?;
    let notifier = LogNotifier;

    terminal.draw(|buffer| app.render(buffer))?;
    app.clear_redraw();

    while app.is_running() {
        select! {
            recv(input_rx) -> event => match event {
                Ok(InputEvent::Error(message)) => {
                    log::warn!("event=input_error module=main status=error error={message}");
                }
                Ok(event) => {
                    if let InputEvent::Resize { width, height } = event {
                        terminal.resize(width, height);
                    }
                    app.handle_input(&event);
                }
                Err(_) => break,
            },
            recv(today.receiver()) -> _ => app.set_now(Local::now().naive_local()),
            recv(reminder_tick.receiver()) -> _ => match app.check_reminders(Utc::now(), &notifier) {
                Ok(0) => {}
                Ok(sent) => log::info!("event=reminder_poll module=main status=ok sent={sent}"),
                Err(err) => log::warn!("event=reminder_poll module=main status=error error={err}"),
            },
        }

        if app.needs_redraw() {
            terminal.draw(|buffer| app.render(buffer))?;
            app.clear_redraw();
        }
    }

    input.join();
    today.join();
    reminder_tick.join();
    log::info!("event=app_exit module=main status=ok");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = load_config(&args).and_then(|config| {
        init_logging(&config.log_level, &config.log_dir)?;
        match args.snapshot {
            Some(size) => snapshot(&config, args.tab, size),
            None => run_interactive(&config, args.tab),
        }
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=app_exit module=main status=error error={err}");
            eprintln!("yearclock: {err}");
            ExitCode::FAILURE
        }
    }
}
