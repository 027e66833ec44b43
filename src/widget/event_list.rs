//! Event list: a search field over a scrollable list of events.
//!
//! Typing edits the search term; the shell reads it back with
//! [`EventList::query`] and refills the list. `Delete` asks for the
//! selected event to be removed.

use super::theme::Theme;
use super::traits::{ViewCallbacks, Widget};
use crate::actor::{InputEvent, KeyCode, MouseButton};
use crate::buffer::{Buffer, Cell, Modifiers, Rgb, TextStyle};
use crate::layout::Rect;
use crate::model::{CategorySet, Event, EventId};

/// One displayed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    /// Event id, passed back in callbacks.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// Day of month the event starts on.
    pub day: u32,
    /// `1.3 - 15.4`
    pub short_range: String,
    /// `1.3.2025 - 15.4.2025`
    pub full_range: String,
    /// Category colour, grey when the category is unknown.
    pub color: Rgb,
}

impl EventRow {
    /// Row for `event`, coloured from `categories`.
    pub fn from_event(event: &Event, categories: &CategorySet) -> Self {
        use chrono::Datelike;
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            category: event.category.clone(),
            day: event.start_date.day(),
            short_range: event.short_range_label(),
            full_range: event.date_range_label(),
            color: categories.color_of(&event.category).unwrap_or(Rgb::new(204, 204, 204)),
        }
    }
}

/// Searchable list of events.
#[derive(Debug)]
pub struct EventList {
    bounds: Rect,
    theme: Theme,
    query: String,
    rows: Vec<EventRow>,
    selected: usize,
    scroll: usize,
    dirty: bool,
}

impl EventList {
    /// Rows taken by the search field and result count.
    const HEADER_ROWS: u16 = 2;

    /// An empty list.
    pub const fn new(bounds: Rect, theme: Theme) -> Self {
        Self {
            bounds,
            theme,
            query: String::new(),
            rows: Vec::new(),
            selected: 0,
            scroll: 0,
            dirty: true,
        }
    }

    /// Current search term.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search term.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.dirty = true;
    }

    /// Replace the displayed rows, keeping the selection in range.
    pub fn set_rows(&mut self, rows: Vec<EventRow>) {
        self.rows = rows;
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.scroll_to_selection();
        self.dirty = true;
    }

    /// Displayed rows.
    pub fn rows(&self) -> &[EventRow] {
        &self.rows
    }

    /// Highlighted row, if any.
    pub fn selected(&self) -> Option<&EventRow> {
        self.rows.get(self.selected)
    }

    fn list_area(&self) -> Rect {
        let (_, list) = self.bounds.split_vertical(Self::HEADER_ROWS);
        list
    }

    fn scroll_to_selection(&mut self) {
        let visible = usize::from(self.list_area().height).max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(visible));
    }

    fn move_selection(&mut self, delta: isize) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
        self.scroll_to_selection();
        self.dirty = true;
        true
    }

    fn page(&self) -> isize {
        isize::try_from(self.list_area().height.max(1)).unwrap_or(1)
    }

    fn row_at(&self, x: u16, y: u16) -> Option<usize> {
        let list = self.list_area();
        if !list.contains(x, y) {
            return None;
        }
        let index = self.scroll + usize::from(y - list.y);
        (index < self.rows.len()).then_some(index)
    }

    fn open(&self, index: usize, callbacks: &mut dyn ViewCallbacks) -> bool {
        let Some(row) = self.rows.get(index) else {
            return false;
        };
        callbacks.on_select_event(&row.id);
        callbacks.on_open_event_detail(&row.id);
        true
    }
}

impl Widget for EventList {
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

        let prompt = format!("Hae: {}▏", self.query);
        let used = buffer.draw_text(area.x + 1, area.y, &prompt, theme.text_style(), area.width.saturating_sub(2));
        if self.query.is_empty() {
            buffer.draw_text(
                area.x + 1 + used,
                area.y,
                "nimi, kuvaus tai kategoria",
                theme.muted_style(),
                area.width.saturating_sub(used + 2),
            );
        } else if area.height > 1 {
            let count = format!("Hakutulokset: {} tapahtumaa", self.rows.len());
            buffer.draw_text(area.x + 1, area.y + 1, &count, theme.muted_style(), area.width.saturating_sub(2));
        }

        let list = self.list_area().intersection(&area);
        if list.is_empty() {
            return;
        }
        if self.rows.is_empty() {
            let message = if self.query.is_empty() {
                "Ei tapahtumia näytettäväksi."
            } else {
                "Ei hakutuloksia. Kokeile eri hakusanoja."
            };
            buffer.draw_text(list.x + 1, list.y, message, theme.muted_style(), list.width.saturating_sub(2));
            return;
        }

        let name_width = list.width.saturating_sub(4) / 2;
        let range_width = 23.min(list.width.saturating_sub(name_width + 4));
        for (row_y, (index, row)) in (list.y..list.bottom()).zip(self.rows.iter().enumerate().skip(self.scroll)) {
            let highlighted = index == self.selected;
            if highlighted {
                buffer.fill_rect(Rect::new(list.x, row_y, list.width, 1), Cell::new(' ').with_bg(theme.surface));
            }
            let text = if highlighted {
                theme.text_style().with_modifiers(Modifiers::BOLD)
            } else {
                theme.text_style()
            };
            buffer.draw_text(list.x + 1, row_y, "●", TextStyle::overlay(row.color), 1);
            buffer.draw_text(list.x + 3, row_y, &row.name, text, name_width);
            let col = list.x + 3 + name_width + 1;
            buffer.draw_text(col, row_y, &row.full_range, theme.muted_style(), range_width);
            let col = col + range_width + 1;
            if col < list.right() {
                buffer.draw_text(col, row_y, &row.category, TextStyle::overlay(row.color), list.right() - col);
            }
        }
    }

    fn handle_input(&mut self, event: &InputEvent, callbacks: &mut dyn ViewCallbacks) -> bool {
        match event {
            InputEvent::Key { code, modifiers } => match code {
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::PageUp => self.move_selection(-self.page()),
                KeyCode::PageDown => self.move_selection(self.page()),
                KeyCode::Enter => self.open(self.selected, callbacks),
                KeyCode::Delete => match self.selected() {
                    Some(row) => {
                        callbacks.on_delete_event(&row.id);
                        true
                    }
                    None => false,
                },
                KeyCode::Backspace => {
                    if self.query.pop().is_some() {
                        self.dirty = true;
                    }
                    true
                }
                KeyCode::Esc if !self.query.is_empty() => {
                    self.set_query("");
                    true
                }
                KeyCode::Char(c) if !modifiers.control && !modifiers.alt => {
                    self.query.push(*c);
                    self.selected = 0;
                    self.scroll = 0;
                    self.dirty = true;
                    true
                }
                _ => false,
            },
            InputEvent::MouseDown(mouse) if mouse.button == Some(MouseButton::Left) => {
                match self.row_at(mouse.x, mouse.y) {
                    Some(index) => {
                        self.selected = index;
                        self.dirty = true;
                        self.open(index, callbacks)
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
    use crate::actor::{KeyModifiers, MouseEvent};
    use crate::model::event::test_event;
    use crate::widget::ViewSignal;

    fn list(count: usize) -> EventList {
        let categories = CategorySet::from_names(["Markkinointi", "Talous"]);
        let rows = (0..count)
            .map(|i| {
                let month = u32::try_from(i % 12).unwrap() + 1;
                EventRow::from_event(&test_event(&i.to_string(), "Talous", (month, 1), (month, 5)), &categories)
            })
            .collect();
        let mut list = EventList::new(Rect::new(0, 0, 80, 8), Theme::default());
        list.set_rows(rows);
        list
    }

    fn type_text(list: &mut EventList, text: &str) {
        let mut signals: Vec<ViewSignal> = Vec::new();
        for c in text.chars() {
            list.handle_input(&InputEvent::key(KeyCode::Char(c)), &mut signals);
        }
        assert!(signals.is_empty());
    }

    #[test]
    fn test_row_from_event() {
        let categories = CategorySet::from_names(["Markkinointi"]);
        let row = EventRow::from_event(&test_event("a", "Markkinointi", (3, 1), (4, 15)), &categories);
        assert_eq!(row.day, 1);
        assert_eq!(row.short_range, "1.3 - 15.4");
        assert_eq!(row.full_range, "1.3.2025 - 15.4.2025");
        assert_eq!(Some(row.color), categories.color_of("Markkinointi"));

        let unknown = EventRow::from_event(&test_event("b", "Muu", (3, 1), (3, 1)), &categories);
        assert_eq!(unknown.color, Rgb::new(204, 204, 204));
    }

    #[test]
    fn test_typing_edits_query() {
        let mut list = list(3);
        type_text(&mut list, "tal");
        assert_eq!(list.query(), "tal");

        let mut signals: Vec<ViewSignal> = Vec::new();
        list.handle_input(&InputEvent::key(KeyCode::Backspace), &mut signals);
        assert_eq!(list.query(), "ta");

        assert!(list.handle_input(&InputEvent::key(KeyCode::Esc), &mut signals));
        assert_eq!(list.query(), "");
        // A second Esc is left for the shell.
        assert!(!list.handle_input(&InputEvent::key(KeyCode::Esc), &mut signals));
    }

    #[test]
    fn test_control_chars_not_typed() {
        let mut list = list(1);
        let mut signals: Vec<ViewSignal> = Vec::new();
        let ctrl_c = InputEvent::Key {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers {
                control: true,
                ..KeyModifiers::NONE
            },
        };
        assert!(!list.handle_input(&ctrl_c, &mut signals));
        assert_eq!(list.query(), "");
    }

    #[test]
    fn test_enter_opens_and_delete_requests_removal() {
        let mut list = list(3);
        let mut signals: Vec<ViewSignal> = Vec::new();
        list.handle_input(&InputEvent::key(KeyCode::Down), &mut signals);
        list.handle_input(&InputEvent::key(KeyCode::Enter), &mut signals);
        list.handle_input(&InputEvent::key(KeyCode::Delete), &mut signals);
        let id = EventId::from("1");
        assert_eq!(
            signals,
            vec![
                ViewSignal::SelectEvent(id.clone()),
                ViewSignal::OpenEventDetail(id.clone()),
                ViewSignal::DeleteEvent(id),
            ]
        );
    }

    #[test]
    fn test_selection_scrolls() {
        let mut list = list(20);
        let mut signals: Vec<ViewSignal> = Vec::new();
        for _ in 0..10 {
            list.handle_input(&InputEvent::key(KeyCode::Down), &mut signals);
        }
        assert_eq!(list.selected().map(|r| r.id.as_str()), Some("10"));
        // Six list rows below the header.
        assert_eq!(list.scroll, 5);

        let mut buffer = Buffer::new(80, 8);
        list.render(&mut buffer);
        assert!(buffer.row_text(7).contains("event 10"));
    }

    #[test]
    fn test_click_opens_row() {
        let mut list = list(3);
        let mut signals: Vec<ViewSignal> = Vec::new();
        assert!(list.handle_input(&InputEvent::MouseDown(MouseEvent::left(5, 4)), &mut signals));
        assert_eq!(signals.first(), Some(&ViewSignal::SelectEvent(EventId::from("2"))));
        assert!(!list.handle_input(&InputEvent::MouseDown(MouseEvent::left(5, 7)), &mut signals));
    }

    #[test]
    fn test_empty_messages() {
        let mut list = list(0);
        let mut buffer = Buffer::new(80, 8);
        list.render(&mut buffer);
        assert!(buffer.row_text(2).contains("Ei tapahtumia näytettäväksi."));

        list.set_query("zzz");
        list.render(&mut buffer);
        assert!(buffer.row_text(1).contains("Hakutulokset: 0 tapahtumaa"));
        assert!(buffer.row_text(2).contains("Ei hakutuloksia"));
    }
}
