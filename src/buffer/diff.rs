//! Diffing engine: minimal ANSI output between two frames.
//!
//! Each pass compares the displayed frame with the freshly drawn one and
//! emits cursor moves, 24-bit SGR colours and graphemes for the cells that
//! changed. Output accumulates in one `Vec<u8>` and is flushed with a single
//! write by the terminal session.

use super::{Buffer, Cell, Modifiers, Rgb};
use std::io::Write;

/// What the terminal currently shows (cursor, colours, modifiers), as far as
/// this process knows.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// State with the cursor assumed at home and colours unknown.
    pub const fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything, e.g. after a full redraw or a resize.
    pub const fn reset(&mut self) {
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Statistics of one diff pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Cells that differed.
    pub cells_changed: usize,
    /// Cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Colour sequences emitted.
    pub color_changes: usize,
}

/// Emit the sequences that turn `current` into `next`.
///
/// Both buffers must have the same size; callers fall back to
/// [`render_full`] after a resize.
pub fn render_diff(current: &Buffer, next: &Buffer, output: &mut Vec<u8>, state: &mut DiffState) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = usize::from(next.width());

    for (idx, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new || new.is_wide_continuation() {
            continue;
        }
        result.cells_changed += 1;

        let x = u16::try_from(idx % width).unwrap_or(u16::MAX);
        let y = u16::try_from(idx / width).unwrap_or(u16::MAX);
        if state.cursor_y != y || state.cursor_x != x {
            emit_cursor_move(output, x, y);
            state.cursor_x = x;
            state.cursor_y = y;
            result.cursor_moves += 1;
        }

        emit_style(output, new, state, &mut result);
        output.extend_from_slice(new.grapheme().as_bytes());
        state.cursor_x = state.cursor_x.saturating_add(u16::from(new.display_width().max(1)));
    }

    result
}

/// Emit a complete frame, ignoring what the terminal shows.
pub fn render_full(buffer: &Buffer, output: &mut Vec<u8>, state: &mut DiffState) {
    state.reset();
    output.extend_from_slice(b"\x1b[?25l\x1b[0m");
    let mut scratch = DiffResult::default();

    for (y, row) in buffer.rows().enumerate() {
        emit_cursor_move(output, 0, u16::try_from(y).unwrap_or(u16::MAX));
        for cell in row.iter().filter(|cell| !cell.is_wide_continuation()) {
            emit_style(output, cell, state, &mut scratch);
            output.extend_from_slice(cell.grapheme().as_bytes());
        }
    }
    output.extend_from_slice(b"\x1b[0m");
    state.reset();
}

/// Emit a frame as plain lines for non-interactive output (no cursor moves).
pub fn render_lines(buffer: &Buffer, output: &mut Vec<u8>) {
    let mut state = DiffState::new();
    let mut scratch = DiffResult::default();
    for row in buffer.rows() {
        for cell in row.iter().filter(|cell| !cell.is_wide_continuation()) {
            emit_style(output, cell, &mut state, &mut scratch);
            output.extend_from_slice(cell.grapheme().as_bytes());
        }
        output.extend_from_slice(b"\x1b[0m\n");
        state = DiffState::new();
    }
}

fn emit_style(output: &mut Vec<u8>, cell: &Cell, state: &mut DiffState, result: &mut DiffResult) {
    let mods = cell.modifiers();
    let shown = state.modifiers.unwrap_or_else(Modifiers::empty);
    // SGR has no portable per-attribute "off", so dropping one resets all.
    if state.modifiers.is_none() || !shown.difference(mods).is_empty() {
        output.extend_from_slice(b"\x1b[0m");
        state.fg = None;
        state.bg = None;
        emit_modifier_set(output, mods);
        state.modifiers = Some(mods);
    } else if shown != mods {
        emit_modifier_set(output, mods.difference(shown));
        state.modifiers = Some(mods);
    }

    if state.fg != Some(cell.fg()) {
        emit_fg_color(output, cell.fg());
        state.fg = Some(cell.fg());
        result.color_changes += 1;
    }
    if state.bg != Some(cell.bg()) {
        emit_bg_color(output, cell.bg());
        state.bg = Some(cell.bg());
        result.color_changes += 1;
    }
}

#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    let row = u32::from(y) + 1;
    let col = u32::from(x) + 1;
    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

fn emit_modifier_set(output: &mut Vec<u8>, modifiers: Modifiers) {
    for (flag, code) in [
        (Modifiers::BOLD, b"\x1b[1m"),
        (Modifiers::DIM, b"\x1b[2m"),
        (Modifiers::ITALIC, b"\x1b[3m"),
        (Modifiers::UNDERLINE, b"\x1b[4m"),
        (Modifiers::REVERSED, b"\x1b[7m"),
    ] {
        if modifiers.contains(flag) {
            output.extend_from_slice(code);
        }
    }
}
