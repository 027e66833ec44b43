//! The application shell: four tabs over one open project.
//!
//! The shell owns the workspace and every view. Views raise
//! [`ViewSignal`]s; the shell applies them, mutates the workspace and
//! rebuilds what depends on it. Nothing is cached between passes.

use crate::actor::{InputEvent, KeyCode};
use crate::buffer::Buffer;
use crate::config::AppConfig;
use crate::error::Result;
use crate::layout::{ClockInput, Rect, StackOrder, TimelineInput, YearSpan};
use crate::model::EventId;
use crate::service::{Notifier, ProjectWorkspace, ReminderService};
use crate::store::Storage;
use crate::widget::{AgendaView, EventList, EventRow, RadialClock, StatusBar, Timeline, ViewSignal, Widget};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

/// The views, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Radial year clock.
    Clock,
    /// Category lanes over a year.
    Timeline,
    /// Events of one month.
    Agenda,
    /// Searchable list of all events.
    List,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Self; 4] = [Self::Clock, Self::Timeline, Self::Agenda, Self::List];

    /// Title shown in the status bar.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Clock => "Kello",
            Self::Timeline => "Aikajana",
            Self::Agenda => "Agenda",
            Self::List => "Lista",
        }
    }

    /// Position in [`Tab::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The following tab, wrapping around.
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The preceding tab, wrapping around.
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The running application.
#[derive(Debug)]
pub struct App<S> {
    workspace: ProjectWorkspace<S>,
    reminders: ReminderService<S>,
    stack_order: StackOrder,
    tab: Tab,
    year: i32,
    month0: u32,
    now: NaiveDateTime,
    selected_event: Option<EventId>,
    clock: RadialClock,
    timeline: Timeline,
    agenda: AgendaView,
    list: EventList,
    status: StatusBar,
    size: (u16, u16),
    running: bool,
    dirty: bool,
}

impl<S: Storage> App<S> {
    /// Build the shell for a `width` x `height` terminal.
    ///
    /// Shows `config.year`, or the year of `now`, starting on the clock tab.
    pub fn new(
        workspace: ProjectWorkspace<S>,
        reminders: ReminderService<S>,
        config: &AppConfig,
        now: NaiveDateTime,
        (width, height): (u16, u16),
    ) -> Self {
        let theme = config.theme;
        let empty = Rect::default();
        let mut app = Self {
            workspace,
            reminders,
            stack_order: config.stack_order,
            tab: Tab::Clock,
            year: config.year.unwrap_or_else(|| now.year()),
            month0: now.month0(),
            now,
            selected_event: None,
            clock: RadialClock::new(empty, config.clock, theme),
            timeline: Timeline::new(empty, config.timeline, theme),
            agenda: AgendaView::new(empty, theme, now.year()),
            list: EventList::new(empty, theme),
            status: StatusBar::new(empty, theme),
            size: (width, height),
            running: true,
            dirty: true,
        };
        app.status.set_left(app.workspace.project().name.clone());
        app.update_tabs();
        app.update_clock_text();
        app.layout();
        app
    }

    /// The open project.
    pub const fn workspace(&self) -> &ProjectWorkspace<S> {
        &self.workspace
    }

    /// Active tab.
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// Displayed year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month shown by the agenda (0 = January).
    pub const fn month(&self) -> u32 {
        self.month0
    }

    /// Last picked event.
    pub const fn selected_event(&self) -> Option<&EventId> {
        self.selected_event.as_ref()
    }

    /// The status bar, for inspecting the detail line.
    pub const fn status(&self) -> &StatusBar {
        &self.status
    }

    /// `false` once the user asked to quit.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether anything changed since the last [`App::render`].
    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.active_view().needs_redraw() || self.status.needs_redraw()
    }

    /// Adopt a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.layout();
    }

    /// Views get every row but the last; the status bar gets that one.
    fn layout(&mut self) {
        let (main, status) = Rect::from_size(self.size.0, self.size.1).split_vertical(self.size.1.saturating_sub(1));
        self.clock.set_bounds(main);
        self.timeline.set_bounds(main);
        self.agenda.set_bounds(main);
        self.list.set_bounds(main);
        self.status.set_bounds(status);
        // Timeline scenes are sized to the plot.
        self.refresh();
    }

    /// Rebuild every view from the workspace.
    pub fn refresh(&mut self) {
        let ws = &self.workspace;
        let events = ws.events();
        let categories = ws.categories();
        let selected = ws.selected_categories();

        self.clock.update(&ClockInput {
            events,
            categories,
            selected,
            span: YearSpan::calendar(self.year),
            now: self.now,
            order: self.stack_order,
        });
        self.timeline.update(
            &TimelineInput {
                events,
                categories,
                selected,
                year: self.year,
                now: self.now,
            },
            ws.available_years(self.now.year()),
        );
        self.agenda.update(events, categories, selected, self.year, self.month0);
        self.refresh_list();
        self.dirty = true;
    }

    /// Events matching the typed term, all of them when it is blank.
    fn refresh_list(&mut self) {
        let categories = self.workspace.categories();
        let rows = self
            .workspace
            .filter(self.list.query())
            .into_iter()
            .map(|event| EventRow::from_event(event, categories))
            .collect();
        self.list.set_rows(rows);
    }

    /// Move the today indicator; views are rebuilt when the date changes.
    pub fn set_now(&mut self, now: NaiveDateTime) {
        let date_changed = now.date() != self.now.date();
        self.now = now;
        if date_changed {
            self.refresh();
        } else {
            self.clock.update_now(now);
        }
        self.update_clock_text();
    }

    /// Send due reminders.
    ///
    /// # Errors
    ///
    /// Returns an error if the reminder store cannot be read or written.
    pub fn check_reminders(&self, now: DateTime<Utc>, notifier: &dyn Notifier) -> Result<usize> {
        self.reminders.check_and_send(now, notifier)
    }

    fn update_clock_text(&mut self) {
        self.status.set_right(self.now.format("%-d.%-m.%Y %H:%M").to_string());
    }

    fn update_tabs(&mut self) {
        self.status.set_tabs(Tab::ALL.map(Tab::title), self.tab.index());
    }

    fn set_tab(&mut self, tab: Tab) {
        if tab != self.tab {
            log::debug!("event=tab_switch module=app from={:?} to={tab:?}", self.tab);
            self.tab = tab;
            self.update_tabs();
            self.dirty = true;
        }
    }

    fn active_view(&self) -> &dyn Widget {
        match self.tab {
            Tab::Clock => &self.clock,
            Tab::Timeline => &self.timeline,
            Tab::Agenda => &self.agenda,
            Tab::List => &self.list,
        }
    }

    fn active_view_mut(&mut self) -> &mut dyn Widget {
        match self.tab {
            Tab::Clock => &mut self.clock,
            Tab::Timeline => &mut self.timeline,
            Tab::Agenda => &mut self.agenda,
            Tab::List => &mut self.list,
        }
    }

    /// Route one input event: the active view first, then the global keys.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Resize { width, height } => {
                self.resize(*width, *height);
                return;
            }
            InputEvent::Key {
                code: KeyCode::Char('c'),
                modifiers,
            } if modifiers.control => {
                self.running = false;
                return;
            }
            InputEvent::Shutdown => {
                self.running = false;
                return;
            }
            _ => {}
        }

        let query_before = (self.tab == Tab::List).then(|| self.list.query().to_string());
        let mut signals: Vec<ViewSignal> = Vec::new();
        let consumed = self.active_view_mut().handle_input(event, &mut signals);

        if query_before.is_some_and(|before| before != self.list.query()) {
            self.refresh_list();
        }
        for signal in signals {
            self.apply_signal(signal);
        }
        if !consumed {
            if let InputEvent::Key { code, modifiers } = event {
                if !modifiers.control && !modifiers.alt {
                    self.handle_global_key(*code);
                }
            }
        }
    }

    fn handle_global_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Tab => self.set_tab(self.tab.next()),
            KeyCode::BackTab => self.set_tab(self.tab.prev()),
            KeyCode::F(n @ 1..=4) => self.set_tab(Tab::ALL[usize::from(n - 1)]),
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('0') => {
                self.workspace.show_all_categories();
                self.refresh();
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                let name = self.workspace.categories().names().nth(index).map(String::from);
                if let Some(name) = name {
                    let shown = self.workspace.toggle_category(&name);
                    log::debug!("event=category_toggle module=app category={name} shown={shown}");
                    self.refresh();
                }
            }
            KeyCode::Esc => {
                self.selected_event = None;
                self.status.set_detail(None);
            }
            // The clock has no year control of its own.
            KeyCode::Left if self.tab == Tab::Clock => self.step_year(-1),
            KeyCode::Right if self.tab == Tab::Clock => self.step_year(1),
            _ => {}
        }
    }

    /// Step to the neighbouring year that has events.
    fn step_year(&mut self, delta: isize) {
        let years = self.workspace.available_years(self.now.year());
        let Some(position) = years.iter().position(|&y| y == self.year) else {
            return;
        };
        if let Some(&year) = position.checked_add_signed(delta).and_then(|p| years.get(p)) {
            self.apply_signal(ViewSignal::SelectYear(year));
        }
    }

    /// Apply one user intent raised by a view.
    pub fn apply_signal(&mut self, signal: ViewSignal) {
        match signal {
            ViewSignal::SelectEvent(id) => {
                self.selected_event = Some(id);
            }
            ViewSignal::OpenEventDetail(id) => {
                let detail = self.workspace.event(&id).map(|event| {
                    format!(
                        "{}  {}  Kategoria: {}",
                        event.name,
                        event.date_range_label(),
                        event.category
                    )
                });
                self.status.set_detail(detail);
                self.selected_event = Some(id);
            }
            ViewSignal::SelectMonth(month0) => {
                self.month0 = month0.min(11);
                let ws = &self.workspace;
                self.agenda.update(
                    ws.events(),
                    ws.categories(),
                    ws.selected_categories(),
                    self.year,
                    self.month0,
                );
                self.set_tab(Tab::Agenda);
            }
            ViewSignal::DeleteEvent(id) => self.delete_event(&id),
            ViewSignal::SelectYear(year) => {
                self.year = year;
                self.refresh();
            }
        }
    }

    fn delete_event(&mut self, id: &EventId) {
        match self.workspace.delete_event(id) {
            Ok(event) => {
                if let Err(err) = self.reminders.delete_for_event(id) {
                    log::warn!("event=reminder_cleanup module=app status=error id={id} error={err}");
                }
                if self.selected_event.as_ref() == Some(id) {
                    self.selected_event = None;
                    self.status.set_detail(None);
                }
                log::info!("event=event_delete module=app status=ok id={id} name={}", event.name);
                self.refresh();
            }
            Err(err) => {
                log::warn!("event=event_delete module=app status=error id={id} error={err}");
                self.status.set_detail(Some(err.to_string()));
            }
        }
    }

    /// Draw the active view and the status bar.
    pub fn render(&self, buffer: &mut Buffer) {
        self.active_view().render(buffer);
        self.status.render(buffer);
    }

    /// Mark everything drawn.
    pub fn clear_redraw(&mut self) {
        self.dirty = false;
        self.clock.clear_redraw();
        self.timeline.clear_redraw();
        self.agenda.clear_redraw();
        self.list.clear_redraw();
        self.status.clear_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{KeyModifiers, MouseEvent};
    use crate::model::Reminder;
    use crate::sample::seed_if_empty;
    use crate::store::MemoryStorage;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Arc;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn app() -> App<Arc<MemoryStorage>> {
        let storage = Arc::new(MemoryStorage::new());
        let project = seed_if_empty(&storage, Utc::now()).unwrap().unwrap();
        let workspace = ProjectWorkspace::open(Arc::clone(&storage), project).unwrap();
        App::new(workspace, ReminderService::new(storage), &AppConfig::default(), now(), (100, 40))
    }

    fn press(app: &mut App<Arc<MemoryStorage>>, code: KeyCode) {
        app.handle_input(&InputEvent::key(code));
    }

    fn render(app: &App<Arc<MemoryStorage>>) -> Buffer {
        let mut buffer = Buffer::new(100, 40);
        app.render(&mut buffer);
        buffer
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Clock.next(), Tab::Timeline);
        assert_eq!(Tab::List.next(), Tab::Clock);
        assert_eq!(Tab::Clock.prev(), Tab::List);
    }

    #[test]
    fn test_keys_switch_tabs() {
        let mut app = app();
        assert_eq!(app.tab(), Tab::Clock);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab(), Tab::Timeline);
        press(&mut app, KeyCode::F(4));
        assert_eq!(app.tab(), Tab::List);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab(), Tab::Agenda);
    }

    #[test]
    fn test_status_bar_shows_project_tabs_and_time() {
        let app = app();
        let row = render(&app).row_text(39);
        assert!(row.contains("Vuosikello"));
        assert!(row.contains(" Kello │ Aikajana │ Agenda │ Lista "));
        assert!(row.contains("20.3.2025 09:30"));
    }

    #[test]
    fn test_month_signal_opens_agenda() {
        let mut app = app();
        app.apply_signal(ViewSignal::SelectMonth(2));
        assert_eq!(app.tab(), Tab::Agenda);
        assert_eq!(app.month(), 2);
        assert!(render(&app).row_text(0).contains("Maaliskuu 2025"));
    }

    #[test]
    fn test_open_detail_and_escape() {
        let mut app = app();
        app.apply_signal(ViewSignal::OpenEventDetail(EventId::from("4")));
        assert_eq!(app.selected_event(), Some(&EventId::from("4")));
        let detail = app.status().detail().unwrap();
        assert!(detail.starts_with("Budjetointi"));
        assert!(detail.ends_with("Kategoria: Talous"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.status().detail(), None);
        assert_eq!(app.selected_event(), None);
    }

    #[test]
    fn test_delete_signal_removes_event_and_reminders() {
        let mut app = app();
        let reminder = Reminder {
            id: String::new(),
            event_id: EventId::from("1"),
            event_name: "Tammikuun ale".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            email: "tiimi@example.com".into(),
            remind_at: Utc.with_ymd_and_hms(2024, 12, 31, 8, 0, 0).unwrap(),
        };
        app.reminders.add_reminder(reminder).unwrap();

        app.apply_signal(ViewSignal::DeleteEvent(EventId::from("1")));
        assert_eq!(app.workspace().events().len(), 8);
        assert!(app.workspace().event(&EventId::from("1")).is_none());
        assert!(app.reminders.reminders().unwrap().is_empty());
        assert_eq!(app.list.rows().len(), 8);
    }

    #[test]
    fn test_digit_toggles_category() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert!(!app.workspace().selected_categories().contains("Markkinointi"));
        let scene = app.clock.scene().unwrap();
        assert!(scene.arcs.iter().all(|arc| arc.category != "Markkinointi"));

        press(&mut app, KeyCode::Char('0'));
        assert!(app.workspace().selected_categories().contains("Markkinointi"));
    }

    #[test]
    fn test_list_typing_filters_rows() {
        let mut app = app();
        press(&mut app, KeyCode::F(4));
        assert_eq!(app.list.rows().len(), 9);
        for c in "talous".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let names: Vec<&str> = app.list.rows().iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Budjetointi", "Puolivuotiskatsaus"]);
        // Typed characters are not global keys.
        assert!(app.is_running());
    }

    #[test]
    fn test_list_shows_every_match() {
        let mut app = app();
        press(&mut app, KeyCode::F(4));
        press(&mut app, KeyCode::Char('a'));
        // Each demo category contains an "a", so nothing is cut off.
        assert_eq!(app.list.rows().len(), 9);
        assert!(render(&app).row_text(1).contains("Hakutulokset: 9 tapahtumaa"));

        // Details are searched too.
        for c in "lennus".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let names: Vec<&str> = app.list.rows().iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Tammikuun ale"]);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.is_running());

        let mut app = self::app();
        app.handle_input(&InputEvent::Key {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers {
                control: true,
                ..KeyModifiers::NONE
            },
        });
        assert!(!app.is_running());
    }

    #[test]
    fn test_clock_arrows_step_through_event_years() {
        let mut app = app();
        // Only 2025 has events and now is in 2025.
        press(&mut app, KeyCode::Right);
        assert_eq!(app.year(), 2025);

        app.apply_signal(ViewSignal::SelectYear(2026));
        assert_eq!(app.year(), 2026);
        assert!(app.clock.scene().unwrap().arcs.is_empty());
    }

    #[test]
    fn test_resize_relayouts_views() {
        let mut app = app();
        app.clear_redraw();
        app.handle_input(&InputEvent::Resize { width: 60, height: 20 });
        assert!(app.needs_redraw());
        assert_eq!(app.status.bounds(), Rect::new(0, 19, 60, 1));
        assert_eq!(app.clock.bounds(), Rect::new(0, 0, 60, 19));
        // Pointer events still route after a resize.
        app.handle_input(&InputEvent::MouseMove(MouseEvent::at(1, 1)));
        assert!(app.is_running());
    }

    #[test]
    fn test_set_now_same_day_keeps_scene() {
        let mut app = app();
        let later = now() + chrono::Duration::minutes(5);
        app.set_now(later);
        assert_eq!(app.status().right(), "20.3.2025 09:35");
        assert_eq!(app.clock.scene().unwrap().arcs.len(), 9);
    }
}
