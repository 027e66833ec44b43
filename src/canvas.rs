//! Pixel canvas rasterized onto the cell grid with half blocks.
//!
//! Each terminal cell holds two vertically stacked pixels: the upper one is
//! the foreground of `▀`, the lower one the background. A cell is roughly
//! twice as tall as it is wide, so canvas pixels come out close to square.
//!
//! Shapes take pixel coordinates as `f64`; a pixel is covered when its centre
//! falls inside the shape.

use crate::buffer::{Buffer, Cell, Rgb};
use crate::layout::projection::angle_at;
use crate::layout::Rect;

/// The upper half block used to pack two pixels into one cell.
pub const UPPER_HALF: &str = "▀";

/// A row-major grid of colours.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    pixels: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl PixelCanvas {
    /// A canvas filled with `background`.
    pub fn new(width: usize, height: usize, background: Rgb) -> Self {
        Self {
            pixels: vec![background; width * height],
            width,
            height,
        }
    }

    /// A canvas covering `area` cells: one pixel per column, two per row.
    pub fn for_area(area: Rect, background: Rgb) -> Self {
        Self::new(usize::from(area.width), usize::from(area.height) * 2, background)
    }

    /// Width in pixels.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Pixel at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Set every pixel.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Composite `color` onto one pixel; out-of-range writes are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: f64) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }
        let pixel = &mut self.pixels[y * self.width + x];
        *pixel = if alpha >= 1.0 { color } else { color.over(*pixel, alpha) };
    }

    /// Pixel index range covering `[from, to]`, clipped to `0..limit`.
    #[allow(clippy::cast_possible_truncation)]
    fn span(from: f64, to: f64, limit: usize) -> std::ops::Range<i64> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let lo = (from.floor() as i64).clamp(0, limit);
        let hi = (to.ceil() as i64 + 1).clamp(0, limit);
        lo..hi
    }

    /// Fill the rectangle `[x0, x1] × [y0, y1]`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb, alpha: f64) {
        for py in Self::span(y0, y1, self.height) {
            let cy = py as f64 + 0.5;
            if cy < y0 || cy > y1 {
                continue;
            }
            for px in Self::span(x0, x1, self.width) {
                let cx = px as f64 + 0.5;
                if cx >= x0 && cx <= x1 {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Fill a disc.
    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb, alpha: f64) {
        self.fill_annular_sector(cx, cy, 0.0, radius, 0.0, std::f64::consts::TAU, color, alpha);
    }

    /// Fill the part of the annulus `[inner, outer]` between two clock angles.
    ///
    /// Angles follow the clock convention: 0 at twelve o'clock, clockwise.
    #[allow(clippy::too_many_arguments, clippy::cast_precision_loss)]
    pub fn fill_annular_sector(
        &mut self,
        cx: f64,
        cy: f64,
        inner: f64,
        outer: f64,
        start_angle: f64,
        end_angle: f64,
        color: Rgb,
        alpha: f64,
    ) {
        if outer <= 0.0 || outer <= inner {
            return;
        }
        let full = end_angle - start_angle >= std::f64::consts::TAU;
        for py in Self::span(cy - outer, cy + outer, self.height) {
            let dy = py as f64 + 0.5 - cy;
            for px in Self::span(cx - outer, cx + outer, self.width) {
                let dx = px as f64 + 0.5 - cx;
                let r = dx.hypot(dy);
                if r < inner || r > outer {
                    continue;
                }
                if full || (start_angle..=end_angle).contains(&angle_at(dx, dy)) {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Draw a circle outline `thickness` pixels wide.
    pub fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, thickness: f64, color: Rgb) {
        let half = thickness / 2.0;
        self.fill_annular_sector(cx, cy, radius - half, radius + half, 0.0, std::f64::consts::TAU, color, 1.0);
    }

    /// Draw a one-pixel line, optionally dashed as `(on, off)` pixel runs.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb, dash: Option<(f64, f64)>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = dx.hypot(dy);
        let steps = length.ceil().max(1.0) as i64;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            if let Some((on, off)) = dash {
                if (t * length) % (on + off) >= on {
                    continue;
                }
            }
            let x = t.mul_add(dx, from.0).floor() as i64;
            let y = t.mul_add(dy, from.1).floor() as i64;
            self.blend(x, y, color, 1.0);
        }
    }

    /// Copy the canvas into `buffer` with its top-left cell at `origin`.
    ///
    /// Cells whose two pixels match are written as plain background so the
    /// frame diff stays small.
    pub fn blit(&self, buffer: &mut Buffer, origin: (u16, u16)) {
        for row in 0..self.height.div_ceil(2) {
            let Ok(y) = u16::try_from(row).map(|r| origin.1.saturating_add(r)) else {
                break;
            };
            for col in 0..self.width {
                let Ok(x) = u16::try_from(col).map(|c| origin.0.saturating_add(c)) else {
                    break;
                };
                let upper = self.pixels[row * 2 * self.width + col];
                let lower = self.get(col, row * 2 + 1).unwrap_or(upper);
                let cell = if upper == lower {
                    Cell::new(' ').with_bg(upper)
                } else {
                    Cell::from_grapheme(UPPER_HALF).with_fg(upper).with_bg(lower)
                };
                buffer.set(x, y, cell);
            }
        }
    }
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PixelCanvas({}x{})", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_for_area_doubles_rows() {
        let canvas = PixelCanvas::for_area(Rect::new(3, 4, 10, 5), Rgb::BLACK);
        assert_eq!((canvas.width(), canvas.height()), (10, 10));
    }

    #[test]
    fn test_fill_rect_covers_pixel_centres() {
        let mut canvas = PixelCanvas::new(10, 10, Rgb::BLACK);
        canvas.fill_rect(2.0, 2.0, 4.0, 3.0, RED, 1.0);
        assert_eq!(canvas.get(2, 2), Some(RED));
        assert_eq!(canvas.get(3, 2), Some(RED));
        assert_eq!(canvas.get(4, 2), Some(Rgb::BLACK));
        assert_eq!(canvas.get(2, 3), Some(Rgb::BLACK));
    }

    #[test]
    fn test_alpha_blends() {
        let mut canvas = PixelCanvas::new(1, 1, Rgb::BLACK);
        canvas.blend(0, 0, Rgb::WHITE, 0.5);
        assert_eq!(canvas.get(0, 0), Some(Rgb::new(128, 128, 128)));
        canvas.blend(-1, 0, Rgb::WHITE, 1.0);
        canvas.blend(5, 5, Rgb::WHITE, 1.0);
    }

    #[test]
    fn test_sector_fills_one_quadrant() {
        let mut canvas = PixelCanvas::new(40, 40, Rgb::BLACK);
        // Twelve to three o'clock: the upper right quadrant.
        canvas.fill_annular_sector(20.0, 20.0, 5.0, 15.0, 0.0, FRAC_PI_2, RED, 1.0);
        assert_eq!(canvas.get(28, 12), Some(RED));
        assert_eq!(canvas.get(12, 12), Some(Rgb::BLACK));
        assert_eq!(canvas.get(28, 28), Some(Rgb::BLACK));
        // Inside the inner radius stays empty.
        assert_eq!(canvas.get(21, 18), Some(Rgb::BLACK));
    }

    #[test]
    fn test_sector_lower_half() {
        let mut canvas = PixelCanvas::new(40, 40, Rgb::BLACK);
        canvas.fill_annular_sector(20.0, 20.0, 0.0, 15.0, FRAC_PI_2, 3.0 * FRAC_PI_2, RED, 1.0);
        assert_eq!(canvas.get(20, 30), Some(RED));
        assert_eq!(canvas.get(20, 10), Some(Rgb::BLACK));
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut solid = PixelCanvas::new(20, 1, Rgb::BLACK);
        solid.line((0.5, 0.5), (19.5, 0.5), RED, None);
        let mut dashed = PixelCanvas::new(20, 1, Rgb::BLACK);
        dashed.line((0.5, 0.5), (19.5, 0.5), RED, Some((3.0, 3.0)));
        let count = |c: &PixelCanvas| (0..20).filter(|&x| c.get(x, 0) == Some(RED)).count();
        assert_eq!(count(&solid), 20);
        assert!(count(&dashed) < 15 && count(&dashed) > 5);
    }

    #[test]
    fn test_blit_packs_pixel_pairs() {
        let mut canvas = PixelCanvas::new(2, 3, Rgb::BLACK);
        canvas.blend(0, 0, RED, 1.0);
        let mut buffer = Buffer::new(4, 4);
        canvas.blit(&mut buffer, (1, 1));

        let split = buffer.get(1, 1).unwrap();
        assert_eq!(split.grapheme(), UPPER_HALF);
        assert_eq!((split.fg(), split.bg()), (RED, Rgb::BLACK));
        assert_eq!(split.surface(), RED);

        let plain = buffer.get(2, 1).unwrap();
        assert_eq!(plain.grapheme(), " ");
        assert_eq!(plain.bg(), Rgb::BLACK);

        // Odd height: the last row repeats its upper pixel.
        assert_eq!(buffer.get(1, 2).unwrap().grapheme(), " ");
    }
}
