//! Double-buffered frame presenter.
//!
//! Holds the frame the terminal shows and the frame being drawn. Each pass
//! draws into `next` from scratch, then emits only the differences.

use crate::buffer::diff::{render_diff, render_full, DiffResult, DiffState};
use crate::buffer::Buffer;
use std::time::Instant;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames presented.
    pub frames: u64,
    /// Frames that were full redraws.
    pub full_redraws: u64,
    /// Total bytes produced.
    pub bytes_written: u64,
    /// Smoothed present time in microseconds.
    pub avg_render_us: u64,
    /// Last present time in microseconds.
    pub last_render_us: u64,
}

/// Current and next frame plus the ANSI output of the last pass.
#[derive(Debug)]
pub struct Screen {
    /// What the terminal shows.
    current: Buffer,
    /// What is being drawn.
    next: Buffer,
    /// Cursor/colour tracking across passes.
    diff_state: DiffState,
    /// Pre-allocated output buffer, flushed with one write.
    output: Vec<u8>,
    needs_full_redraw: bool,
    stats: RenderStats,
}

impl Screen {
    /// A screen whose first pass is a full redraw.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            current: Buffer::new(width, height),
            next: Buffer::new(width, height),
            diff_state: DiffState::new(),
            output: Vec::with_capacity(65536),
            needs_full_redraw: true,
            stats: RenderStats::default(),
        }
    }

    /// Columns.
    pub const fn width(&self) -> u16 {
        self.next.width()
    }

    /// Rows.
    pub const fn height(&self) -> u16 {
        self.next.height()
    }

    /// The frame last presented.
    pub const fn current(&self) -> &Buffer {
        &self.current
    }

    /// Statistics so far.
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Resize both frames. The next pass redraws everything, so nothing
    /// drawn for the old size survives.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.current.resize(width, height);
        self.next.resize(width, height);
        self.mark_full_dirty();
    }

    /// Force the next pass to redraw everything.
    pub const fn mark_full_dirty(&mut self) {
        self.needs_full_redraw = true;
    }

    /// Draw a frame with `draw` and return the bytes that show it.
    ///
    /// `next` is cleared before `draw` runs, so every pass paints the whole
    /// frame.
    pub fn present<F>(&mut self, draw: F) -> (&[u8], DiffResult)
    where
        F: FnOnce(&mut Buffer),
    {
        let start = Instant::now();
        self.output.clear();
        self.next.clear();
        draw(&mut self.next);

        let result = if self.needs_full_redraw {
            self.output.extend_from_slice(b"\x1b[2J");
            render_full(&self.next, &mut self.output, &mut self.diff_state);
            self.needs_full_redraw = false;
            self.stats.full_redraws += 1;
            DiffResult {
                cells_changed: self.next.len(),
                ..DiffResult::default()
            }
        } else {
            render_diff(&self.current, &self.next, &mut self.output, &mut self.diff_state)
        };

        self.current.swap(&mut self.next);

        let elapsed = start.elapsed();
        self.stats.frames += 1;
        self.stats.bytes_written += self.output.len() as u64;
        self.stats.last_render_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        // Smoothed average
        if self.stats.avg_render_us == 0 {
            self.stats.avg_render_us = self.stats.last_render_us;
        } else {
            self.stats.avg_render_us = (self.stats.avg_render_us * 15 + self.stats.last_render_us) / 16;
        }

        (&self.output, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Cell, Rgb, TextStyle};

    #[test]
    fn test_first_pass_is_full() {
        let mut screen = Screen::new(10, 3);
        let (bytes, result) = screen.present(|buf| {
            buf.set(0, 0, Cell::new('a'));
        });
        assert!(bytes.starts_with(b"\x1b[2J"));
        assert_eq!(result.cells_changed, 30);
        assert_eq!(screen.stats().full_redraws, 1);
        assert_eq!(screen.current().get(0, 0).unwrap().grapheme(), "a");
    }

    #[test]
    fn test_unchanged_frame_emits_nothing() {
        let mut screen = Screen::new(10, 3);
        let draw = |buf: &mut Buffer| {
            buf.draw_text(0, 1, "hello", TextStyle::new(Rgb::WHITE, Rgb::BLACK), 10);
        };
        screen.present(draw);
        let (bytes, result) = screen.present(draw);
        assert!(bytes.is_empty());
        assert_eq!(result.cells_changed, 0);
    }

    #[test]
    fn test_diff_only_changed_cells() {
        let mut screen = Screen::new(10, 3);
        screen.present(|buf| {
            buf.set(2, 2, Cell::new('x'));
        });
        let (bytes, result) = screen.present(|buf| {
            buf.set(2, 2, Cell::new('y'));
        });
        assert_eq!(result.cells_changed, 1);
        let text = String::from_utf8_lossy(bytes);
        assert!(text.contains("\x1b[3;3H"));
        assert!(text.ends_with('y'));
    }

    #[test]
    fn test_resize_forces_full_redraw() {
        let mut screen = Screen::new(10, 3);
        screen.present(|_| {});
        screen.resize(20, 5);
        let (bytes, result) = screen.present(|_| {});
        assert!(bytes.starts_with(b"\x1b[2J"));
        assert_eq!(result.cells_changed, 100);
        assert_eq!(screen.width(), 20);
        assert_eq!(screen.stats().frames, 2);
    }
}
