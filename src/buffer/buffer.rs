//! Buffer: a grid of cells representing one frame of the screen.
//!
//! Cells are stored row-major in a contiguous `Vec`. All writes are clipped
//! to the grid, so widgets may draw partially off-screen without checks.

use super::cell::{Cell, Modifiers, Rgb};
use crate::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Colours and modifiers applied to drawn text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Foreground colour.
    pub fg: Rgb,
    /// Background colour. `None` keeps the surface colour underneath.
    pub bg: Option<Rgb>,
    /// Modifiers.
    pub modifiers: Modifiers,
}

impl TextStyle {
    /// Text in `fg` over an explicit background.
    pub const fn new(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg: Some(bg),
            modifiers: Modifiers::empty(),
        }
    }

    /// Text in `fg` that keeps whatever surface colour is underneath.
    pub const fn overlay(fg: Rgb) -> Self {
        Self {
            fg,
            bg: None,
            modifiers: Modifiers::empty(),
        }
    }

    /// Add modifiers (builder pattern).
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A grid of cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Buffer {
    /// Create a new buffer. Zero dimensions are raised to 1.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            cells: vec![Cell::EMPTY; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Buffer width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true after construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) to a linear index, `None` when out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Mutable cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index_of(x, y).map(|i| &mut self.cells[i])
    }

    /// Set a cell. Returns `false` if out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Write one grapheme, returning the columns it occupies (0 if clipped).
    ///
    /// Wide graphemes also claim the next column with a continuation cell.
    /// A wide grapheme that would straddle the right edge is not drawn.
    pub fn set_grapheme(&mut self, x: u16, y: u16, grapheme: &str, style: TextStyle) -> u16 {
        let Some(idx) = self.index_of(x, y) else {
            return 0;
        };
        let width = u16::try_from(grapheme.width()).unwrap_or(1).max(1);
        if width == 2 && x + 1 >= self.width {
            return 0;
        }

        let bg = style.bg.unwrap_or_else(|| self.cells[idx].surface());
        self.cells[idx] = Cell::from_grapheme(grapheme)
            .with_fg(style.fg)
            .with_bg(bg)
            .with_modifiers(style.modifiers);

        if width == 2 {
            if let Some(next) = self.index_of(x + 1, y) {
                self.cells[next] = Cell::wide_continuation().with_bg(bg);
            }
        }
        width
    }

    /// Draw a string starting at (x, y), stopping after `max_width` columns.
    ///
    /// Returns the number of columns written.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: TextStyle, max_width: u16) -> u16 {
        let limit = max_width.min(self.width.saturating_sub(x));
        let mut used = 0u16;
        for grapheme in text.graphemes(true) {
            if grapheme.chars().any(char::is_control) {
                continue;
            }
            let width = u16::try_from(grapheme.width()).unwrap_or(1).max(1);
            if used + width > limit {
                break;
            }
            used += self.set_grapheme(x + used, y, grapheme, style);
        }
        used
    }

    /// Draw text centred on column `center_x`, clipped to `clip`.
    pub fn draw_text_centered(&mut self, center_x: i32, y: u16, text: &str, style: TextStyle, clip: Rect) {
        let width = i32::try_from(text.width()).unwrap_or(i32::MAX);
        let start = (center_x - width / 2).max(i32::from(clip.x));
        let Ok(start) = u16::try_from(start) else {
            return;
        };
        if y < clip.y || y >= clip.bottom() || start >= clip.right() {
            return;
        }
        self.draw_text(start, y, text, style, clip.right() - start);
    }

    /// Fill a rectangle with a cell, clipped to the buffer.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        let area = rect.intersection(&self.area());
        for row in area.y..area.bottom() {
            for col in area.x..area.right() {
                if let Some(idx) = self.index_of(col, row) {
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Clear the entire buffer.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, discarding content.
    ///
    /// After a resize the previous frame no longer describes the screen, so
    /// there is nothing worth preserving.
    pub fn resize(&mut self, width: u16, height: u16) {
        let width = width.max(1);
        let height = height.max(1);
        if width == self.width && height == self.height {
            return;
        }
        self.cells = vec![Cell::EMPTY; usize::from(width) * usize::from(height)];
        self.width = width;
        self.height = height;
    }

    /// Copy content from a buffer of the same size.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    /// Swap the contents of two buffers in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }

    /// The graphemes of row `y` concatenated, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| {
                row.iter()
                    .filter(|cell| !cell.is_wide_continuation())
                    .map(Cell::grapheme)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> TextStyle {
        TextStyle::new(Rgb::WHITE, Rgb::BLACK)
    }

    #[test]
    fn test_buffer_new() {
        let buffer = Buffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.len(), 80 * 24);
    }

    #[test]
    fn test_buffer_zero_size_is_raised() {
        let buffer = Buffer::new(0, 0);
        assert_eq!((buffer.width(), buffer.height()), (1, 1));
    }

    #[test]
    fn test_buffer_bounds() {
        let mut buffer = Buffer::new(80, 24);
        assert!(buffer.get(79, 23).is_some());
        assert!(buffer.get(80, 23).is_none());
        assert!(!buffer.set(0, 24, Cell::new('x')));
    }

    #[test]
    fn test_set_grapheme_wide() {
        let mut buffer = Buffer::new(10, 1);
        assert_eq!(buffer.set_grapheme(5, 0, "日", plain()), 2);
        assert!(buffer.get(6, 0).unwrap().is_wide_continuation());
        // No room for a wide grapheme in the last column.
        assert_eq!(buffer.set_grapheme(9, 0, "日", plain()), 0);
    }

    #[test]
    fn test_draw_text_clips() {
        let mut buffer = Buffer::new(8, 2);
        let used = buffer.draw_text(2, 1, "Markkinointi", plain(), 100);
        assert_eq!(used, 6);
        assert_eq!(buffer.row_text(1), "  Markki");
    }

    #[test]
    fn test_draw_text_respects_max_width() {
        let mut buffer = Buffer::new(20, 1);
        let used = buffer.draw_text(0, 0, "Henkilöstöhallinto", plain(), 5);
        assert_eq!(used, 5);
        assert_eq!(buffer.row_text(0).trim_end(), "Henki");
    }

    #[test]
    fn test_overlay_text_keeps_surface() {
        let mut buffer = Buffer::new(4, 1);
        let surface = Rgb::new(40, 80, 120);
        buffer.set(0, 0, Cell::new('▀').with_fg(surface).with_bg(Rgb::BLACK));
        buffer.draw_text(0, 0, "a", TextStyle::overlay(Rgb::WHITE), 4);
        assert_eq!(buffer.get(0, 0).unwrap().bg(), surface);
    }

    #[test]
    fn test_draw_text_centered() {
        let mut buffer = Buffer::new(11, 1);
        buffer.draw_text_centered(5, 0, "abc", plain(), buffer.area());
        assert_eq!(buffer.row_text(0), "    abc    ");
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buffer = Buffer::new(10, 5);
        buffer.fill_rect(Rect::new(8, 3, 5, 5), Cell::new('X'));
        assert_eq!(buffer.get(9, 4).unwrap().grapheme(), "X");
        assert_eq!(buffer.get(7, 4).unwrap().grapheme(), " ");
    }

    #[test]
    fn test_resize_clears() {
        let mut buffer = Buffer::new(80, 24);
        buffer.set(5, 5, Cell::new('X'));
        buffer.resize(100, 30);
        assert_eq!(buffer.width(), 100);
        assert_eq!(buffer.get(5, 5), Some(&Cell::EMPTY));
    }

    #[test]
    fn test_buffer_swap() {
        let mut a = Buffer::new(4, 1);
        let mut b = Buffer::new(6, 2);
        a.set(0, 0, Cell::new('A'));
        b.set(0, 0, Cell::new('B'));
        a.swap(&mut b);
        assert_eq!(a.get(0, 0).unwrap().grapheme(), "B");
        assert_eq!(a.width(), 6);
        assert_eq!(b.get(0, 0).unwrap().grapheme(), "A");
    }
}
