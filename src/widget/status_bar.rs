//! Status Bar Widget: project name, tab strip and clock on one row.
//!
//! The left section is left-aligned, the tabs are centred and the right
//! section is right-aligned. A detail line, when set, replaces the tabs.

use super::theme::Theme;
use super::traits::{ViewCallbacks, Widget};
use crate::actor::InputEvent;
use crate::buffer::{Buffer, Cell, Modifiers, TextStyle};
use crate::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// A one-row status bar.
#[derive(Debug)]
pub struct StatusBar {
    /// Left section content.
    left: String,
    /// Tab titles.
    tabs: Vec<String>,
    /// Index of the highlighted tab.
    active: usize,
    /// Shown instead of the tabs when set.
    detail: Option<String>,
    /// Right section content.
    right: String,
    /// Widget bounds.
    bounds: Rect,
    theme: Theme,
    /// Needs redraw flag.
    dirty: bool,
}

impl StatusBar {
    /// Create a new status bar with the given bounds.
    pub const fn new(bounds: Rect, theme: Theme) -> Self {
        Self {
            left: String::new(),
            tabs: Vec::new(),
            active: 0,
            detail: None,
            right: String::new(),
            bounds,
            theme,
            dirty: true,
        }
    }

    /// Set the left section content.
    pub fn set_left(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.left {
            self.left = text;
            self.dirty = true;
        }
    }

    /// Set the right section content.
    pub fn set_right(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.right {
            self.right = text;
            self.dirty = true;
        }
    }

    /// Set the tab titles and which one is active.
    pub fn set_tabs<I, S>(&mut self, tabs: I, active: usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tabs = tabs.into_iter().map(Into::into).collect();
        self.active = active;
        self.dirty = true;
    }

    /// Show a detail line in place of the tabs; `None` brings the tabs back.
    pub fn set_detail(&mut self, detail: Option<String>) {
        if detail != self.detail {
            self.detail = detail;
            self.dirty = true;
        }
    }

    /// Get the left section content.
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Get the right section content.
    pub fn right(&self) -> &str {
        &self.right
    }

    /// The detail line, if shown.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Index of the active tab.
    pub const fn active_tab(&self) -> usize {
        self.active
    }

    /// Width of the tab strip: ` a │ b │ c `.
    fn tabs_width(&self) -> usize {
        self.tabs.iter().map(|tab| tab.width() + 2).sum::<usize>() + self.tabs.len().saturating_sub(1)
    }
}

impl Widget for StatusBar {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        let area = self.bounds.intersection(&buffer.area());
        if area.is_empty() {
            return;
        }
        let x = area.x;
        let y = area.y;
        let width = area.width;
        let bg = self.theme.status_bg;
        buffer.fill_rect(Rect::new(x, y, width, 1), Cell::new(' ').with_bg(bg));

        let text = TextStyle::new(self.theme.text, bg);
        let muted = TextStyle::new(self.theme.muted, bg);

        // Left and right sections get a third of the row each.
        let third = width / 3;
        buffer.draw_text(x + 1, y, &self.left, text.with_modifiers(Modifiers::BOLD), third.saturating_sub(1));

        let right_width = u16::try_from(self.right.width()).unwrap_or(u16::MAX).min(third);
        if right_width > 0 {
            buffer.draw_text(x + width - right_width - 1, y, &self.right, muted, right_width);
        }

        let center = Rect::new(x + third, y, width - 2 * third, 1);
        if let Some(detail) = &self.detail {
            buffer.draw_text_centered(i32::from(x + width / 2), y, detail, text, center);
            return;
        }

        let strip = u16::try_from(self.tabs_width()).unwrap_or(u16::MAX);
        let mut col = x + width.saturating_sub(strip) / 2;
        for (index, tab) in self.tabs.iter().enumerate() {
            if index > 0 {
                col += buffer.draw_text(col, y, "│", muted, center.right().saturating_sub(col));
            }
            let label = format!(" {tab} ");
            let style = if index == self.active {
                TextStyle::new(self.theme.accent.contrast_text(), self.theme.accent).with_modifiers(Modifiers::BOLD)
            } else {
                text
            };
            col += buffer.draw_text(col, y, &label, style, (x + width).saturating_sub(col));
        }
    }

    fn handle_input(&mut self, _event: &InputEvent, _callbacks: &mut dyn ViewCallbacks) -> bool {
        // Status bar doesn't handle input
        false
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}
