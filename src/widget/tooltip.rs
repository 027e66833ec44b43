//! Hover tooltip: a small panel of text lines near the pointer.

use super::theme::Theme;
use crate::buffer::{Buffer, Cell, Modifiers, TextStyle};
use crate::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Widest tooltip, in columns, before lines are cut.
const MAX_WIDTH: u16 = 48;

/// A tooltip anchored at a terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    /// First line is the title and is drawn bold.
    pub lines: Vec<String>,
    /// Pointer cell the panel is placed next to.
    pub anchor: (u16, u16),
}

impl Tooltip {
    /// A tooltip with a title and further lines.
    pub fn new(anchor: (u16, u16), title: impl Into<String>) -> Self {
        Self {
            lines: vec![title.into()],
            anchor,
        }
    }

    /// Append a line (builder pattern). Empty lines are dropped.
    #[must_use]
    pub fn line(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.trim().is_empty() {
            self.lines.push(text);
        }
        self
    }

    /// Panel rectangle: right of and above the anchor, kept inside `clip`.
    pub fn area(&self, clip: Rect) -> Rect {
        let text_width = self
            .lines
            .iter()
            .map(|line| u16::try_from(line.width()).unwrap_or(u16::MAX))
            .max()
            .unwrap_or(0);
        let width = (text_width + 2).min(MAX_WIDTH).min(clip.width);
        let height = u16::try_from(self.lines.len()).unwrap_or(u16::MAX).min(clip.height);

        let mut x = self.anchor.0.saturating_add(2);
        if x + width > clip.right() {
            x = self.anchor.0.saturating_sub(width + 1).max(clip.x);
        }
        let mut y = self.anchor.1.saturating_sub(1).max(clip.y);
        if y + height > clip.bottom() {
            y = clip.bottom().saturating_sub(height);
        }
        Rect::new(x, y, width, height)
    }

    /// Draw the panel inside `clip`.
    pub fn render(&self, buffer: &mut Buffer, clip: Rect, theme: &Theme) {
        let area = self.area(clip);
        if area.is_empty() {
            return;
        }
        buffer.fill_rect(area, Cell::new(' ').with_bg(theme.tooltip_bg));
        let body = theme.tooltip_style();
        let title: TextStyle = body.with_modifiers(Modifiers::BOLD);
        for (row, line) in (area.y..area.bottom()).zip(&self.lines) {
            let style = if row == area.y { title } else { body };
            buffer.draw_text(area.x + 1, row, line, style, area.width.saturating_sub(2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_flips_left_at_edge() {
        let clip = Rect::new(0, 0, 40, 10);
        let tip = Tooltip::new((35, 5), "Kesäpäivät").line("Kategoria: HR");
        let area = tip.area(clip);
        assert!(area.right() <= clip.right());
        assert!(area.x < 35);
        assert_eq!(area.height, 2);
    }

    #[test]
    fn test_blank_lines_dropped() {
        let tip = Tooltip::new((0, 0), "a").line("").line("  ").line("b");
        assert_eq!(tip.lines, vec!["a", "b"]);
    }

    #[test]
    fn test_render_draws_title_bold() {
        let theme = Theme::default();
        let mut buffer = Buffer::new(30, 6);
        let tip = Tooltip::new((2, 2), "Title").line("body");
        let bounds = buffer.area();
        tip.render(&mut buffer, bounds, &theme);
        let area = tip.area(bounds);
        let first = buffer.get(area.x + 1, area.y).unwrap();
        assert_eq!(first.grapheme(), "T");
        assert!(first.modifiers().contains(Modifiers::BOLD));
        assert_eq!(first.bg(), theme.tooltip_bg);
        assert!(buffer.row_text(area.y + 1).contains("body"));
    }
}
