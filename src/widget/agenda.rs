//! Month agenda: the events of one month, by start date.
//!
//! ```text
//!  ◀ Maaliskuu 2025 ▶
//!
//!   1  ● Messut
//!        1.3 - 15.4  Markkinointi
//! ```

use super::event_list::EventRow;
use super::theme::{month_name, Theme};
use super::traits::{ViewCallbacks, Widget};
use crate::actor::{InputEvent, KeyCode, MouseButton};
use crate::buffer::{Buffer, Cell, Modifiers, TextStyle};
use crate::layout::Rect;
use crate::model::{query, CategorySet, Event};
use std::collections::BTreeSet;
use unicode_width::UnicodeWidthStr;

/// Rows per entry: name line and date line.
const ENTRY_ROWS: u16 = 2;

/// The agenda view.
#[derive(Debug)]
pub struct AgendaView {
    bounds: Rect,
    theme: Theme,
    year: i32,
    month0: u32,
    rows: Vec<EventRow>,
    selected: usize,
    scroll: usize,
    dirty: bool,
}

impl AgendaView {
    /// An empty agenda for January of `year`.
    pub const fn new(bounds: Rect, theme: Theme, year: i32) -> Self {
        Self {
            bounds,
            theme,
            year,
            month0: 0,
            rows: Vec::new(),
            selected: 0,
            scroll: 0,
            dirty: true,
        }
    }

    /// Show `month0` of `year`, listing the visible events that start or
    /// end in it.
    pub fn update(
        &mut self,
        events: &[Event],
        categories: &CategorySet,
        selected: &BTreeSet<String>,
        year: i32,
        month0: u32,
    ) {
        if (year, month0) != (self.year, self.month0) {
            self.selected = 0;
            self.scroll = 0;
        }
        self.year = year;
        self.month0 = month0.min(11);
        self.rows = query::month_agenda(events, year, self.month0)
            .into_iter()
            .filter(|event| selected.contains(&event.category))
            .map(|event| EventRow::from_event(event, categories))
            .collect();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.scroll_to_selection();
        self.dirty = true;
    }

    /// Displayed month (0 = January).
    pub const fn month(&self) -> u32 {
        self.month0
    }

    /// Displayed year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Entries in display order.
    pub fn rows(&self) -> &[EventRow] {
        &self.rows
    }

    fn title(&self) -> String {
        format!("◀ {} {} ▶", month_name(self.month0), self.year)
    }

    fn list_area(&self) -> Rect {
        let (_, list) = self.bounds.split_vertical(2);
        list.inset(1, 0)
    }

    fn visible_entries(&self) -> usize {
        usize::from(self.list_area().height / ENTRY_ROWS).max(1)
    }

    fn scroll_to_selection(&mut self) {
        let visible = self.visible_entries();
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
    }

    fn move_selection(&mut self, delta: isize) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(self.rows.len() - 1);
        self.scroll_to_selection();
        self.dirty = true;
        true
    }

    /// Neighbouring month; the agenda wraps within the year.
    fn step_month(&self, delta: i32, callbacks: &mut dyn ViewCallbacks) -> bool {
        let month = (i64::from(self.month0) + i64::from(delta)).rem_euclid(12);
        callbacks.on_select_month(u32::try_from(month).unwrap_or(0));
        true
    }

    fn open_selected(&self, callbacks: &mut dyn ViewCallbacks) -> bool {
        let Some(row) = self.rows.get(self.selected) else {
            return false;
        };
        callbacks.on_select_event(&row.id);
        callbacks.on_open_event_detail(&row.id);
        true
    }

    fn entry_at(&self, x: u16, y: u16) -> Option<usize> {
        let list = self.list_area();
        if !list.contains(x, y) {
            return None;
        }
        let index = self.scroll + usize::from((y - list.y) / ENTRY_ROWS);
        (index < self.rows.len()).then_some(index)
    }
}

impl Widget for AgendaView {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.scroll_to_selection();
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        let area = self.bounds.intersection(&buffer.area());
        if area.is_empty() {
            return;
        }
        let theme = &self.theme;
        buffer.fill_rect(area, Cell::new(' ').with_bg(theme.background));
        buffer.draw_text(
            area.x + 1,
            area.y,
            &self.title(),
            theme.text_style().with_modifiers(Modifiers::BOLD),
            area.width.saturating_sub(2),
        );

        let list = self.list_area().intersection(&area);
        if list.is_empty() {
            return;
        }
        if self.rows.is_empty() {
            buffer.draw_text(list.x, list.y, "Ei tapahtumia tälle kuukaudelle", theme.muted_style(), list.width);
            return;
        }

        let entries = self.rows.iter().enumerate().skip(self.scroll);
        for (top, (index, row)) in (list.y..list.bottom()).step_by(usize::from(ENTRY_ROWS)).zip(entries) {
            if index == self.selected {
                let rows = ENTRY_ROWS.min(list.bottom() - top);
                buffer.fill_rect(Rect::new(list.x, top, list.width, rows), Cell::new(' ').with_bg(theme.surface));
            }
            let day = format!("{:>3}", row.day);
            buffer.draw_text(list.x, top, &day, theme.muted_style(), 3);
            buffer.draw_text(list.x + 5, top, "●", TextStyle::overlay(row.color), 1);
            buffer.draw_text(
                list.x + 7,
                top,
                &row.name,
                theme.text_style().with_modifiers(Modifiers::BOLD),
                list.width.saturating_sub(7),
            );
            if top + 1 < list.bottom() {
                let used = buffer.draw_text(
                    list.x + 7,
                    top + 1,
                    &row.short_range,
                    theme.muted_style(),
                    list.width.saturating_sub(7),
                );
                let col = list.x + 7 + used + 2;
                if col < list.right() {
                    buffer.draw_text(col, top + 1, &row.category, TextStyle::overlay(row.color), list.right() - col);
                }
            }
        }
    }

    fn handle_input(&mut self, event: &InputEvent, callbacks: &mut dyn ViewCallbacks) -> bool {
        match event {
            InputEvent::Key { code, .. } => match code {
                KeyCode::Left => self.step_month(-1, callbacks),
                KeyCode::Right => self.step_month(1, callbacks),
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::Enter => self.open_selected(callbacks),
                _ => false,
            },
            InputEvent::MouseDown(mouse) if mouse.button == Some(MouseButton::Left) => {
                if mouse.y == self.bounds.y && self.bounds.contains(mouse.x, mouse.y) {
                    let title_width = self.title().width();
                    let offset = usize::from(mouse.x.saturating_sub(self.bounds.x + 1));
                    return if mouse.x == self.bounds.x + 1 {
                        self.step_month(-1, callbacks)
                    } else if offset + 1 == title_width {
                        self.step_month(1, callbacks)
                    } else {
                        false
                    };
                }
                match self.entry_at(mouse.x, mouse.y) {
                    Some(index) => {
                        self.selected = index;
                        self.dirty = true;
                        self.open_selected(callbacks)
                    }
                    None => false,
                }
            }
            InputEvent::MouseScroll { x, y, delta } if self.bounds.contains(*x, *y) => {
                self.move_selection(if *delta > 0 { -1 } else { 1 })
            }
            _ => false,
        }
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MouseEvent;
    use crate::model::event::test_event;
    use crate::model::EventId;
    use crate::widget::ViewSignal;

    fn events() -> Vec<Event> {
        vec![
            test_event("late", "Talous", (3, 20), (3, 22)),
            test_event("fair", "Markkinointi", (3, 1), (4, 15)),
            test_event("spill", "Talous", (2, 25), (3, 2)),
            test_event("april", "Talous", (4, 2), (4, 3)),
            test_event("hidden", "Muu", (3, 5), (3, 6)),
        ]
    }

    fn agenda(month0: u32) -> AgendaView {
        let categories = CategorySet::from_names(["Markkinointi", "Talous"]);
        let selected: BTreeSet<String> = categories.names().map(String::from).collect();
        let mut view = AgendaView::new(Rect::new(0, 0, 60, 12), Theme::default(), 2025);
        view.update(&events(), &categories, &selected, 2025, month0);
        view
    }

    #[test]
    fn test_month_filter_and_order() {
        let view = agenda(2);
        let ids: Vec<&str> = view.rows().iter().map(|row| row.id.as_str()).collect();
        // Starts or ends in March, hidden categories left out, by start date.
        assert_eq!(ids, vec!["spill", "fair", "late"]);
    }

    #[test]
    fn test_render_title_and_entries() {
        let view = agenda(2);
        let mut buffer = Buffer::new(60, 12);
        view.render(&mut buffer);
        assert!(buffer.row_text(0).contains("◀ Maaliskuu 2025 ▶"));
        assert!(buffer.row_text(2).contains("25  ● event spill"));
        assert!(buffer.row_text(3).contains("25.2 - 2.3  Talous"));
        assert!(buffer.row_text(4).contains("1  ● event fair"));
    }

    #[test]
    fn test_arrows_wrap_months() {
        let mut view = agenda(0);
        let mut signals: Vec<ViewSignal> = Vec::new();
        view.handle_input(&InputEvent::key(KeyCode::Left), &mut signals);
        view.handle_input(&InputEvent::key(KeyCode::Right), &mut signals);
        assert_eq!(signals, vec![ViewSignal::SelectMonth(11), ViewSignal::SelectMonth(1)]);
    }

    #[test]
    fn test_click_entry_opens_detail() {
        let mut view = agenda(2);
        let mut signals: Vec<ViewSignal> = Vec::new();
        // Second entry occupies rows 4 and 5.
        assert!(view.handle_input(&InputEvent::MouseDown(MouseEvent::left(10, 5)), &mut signals));
        let id = EventId::from("fair");
        assert_eq!(signals, vec![ViewSignal::SelectEvent(id.clone()), ViewSignal::OpenEventDetail(id)]);
    }

    #[test]
    fn test_title_arrows_clickable() {
        let mut view = agenda(5);
        let mut signals: Vec<ViewSignal> = Vec::new();
        view.handle_input(&InputEvent::MouseDown(MouseEvent::left(1, 0)), &mut signals);
        let last = u16::try_from(view.title().width()).unwrap();
        view.handle_input(&InputEvent::MouseDown(MouseEvent::left(last, 0)), &mut signals);
        assert_eq!(signals, vec![ViewSignal::SelectMonth(4), ViewSignal::SelectMonth(6)]);
    }

    #[test]
    fn test_empty_month() {
        let view = agenda(7);
        let mut buffer = Buffer::new(60, 12);
        view.render(&mut buffer);
        assert!(buffer.row_text(2).contains("Ei tapahtumia tälle kuukaudelle"));
    }
}
