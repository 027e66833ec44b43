//! Timeline view: one lane per category across a selectable year.
//!
//! ```text
//! ◀ 2025 ▶            19.10.2026
//! Markkinointi  ▐███▌     ┊   ▐██▌
//! Talous           ▐█████▌┊
//!               1.1.  1.2.  1.3. ...
//! ```
//!
//! Scene coordinates are logical pixels: `pixels_per_column` per terminal
//! column and twice that per row, so canvas pixels are logical / ppc.

use super::theme::Theme;
use super::tooltip::Tooltip;
use super::traits::{ViewCallbacks, Widget};
use crate::actor::{InputEvent, KeyCode, MouseButton};
use crate::buffer::{Buffer, Cell, Modifiers, TextStyle};
use crate::canvas::PixelCanvas;
use crate::layout::linear::{EventBar, TimelineConfig, TimelineInput, TimelineScene};
use crate::layout::Rect;
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

/// Sub-areas of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Areas {
    header: Rect,
    labels: Rect,
    plot: Rect,
    axis: Rect,
}

/// The timeline.
#[derive(Debug)]
pub struct Timeline {
    bounds: Rect,
    config: TimelineConfig,
    theme: Theme,
    scene: Option<TimelineScene>,
    years: Vec<i32>,
    today: Option<NaiveDate>,
    hover: Option<(usize, (u16, u16))>,
    dirty: bool,
}

impl Timeline {
    /// An empty timeline; call [`Timeline::update`] before rendering.
    pub fn new(bounds: Rect, config: TimelineConfig, theme: Theme) -> Self {
        Self {
            bounds,
            config,
            theme,
            scene: None,
            years: Vec::new(),
            today: None,
            hover: None,
            dirty: true,
        }
    }

    fn areas(&self) -> Areas {
        let b = self.bounds;
        let label_width = self.config.label_column_width.min(b.width / 4);
        let body_height = b.height.saturating_sub(2);
        Areas {
            header: Rect::new(b.x, b.y, b.width, b.height.min(1)),
            labels: Rect::new(b.x, b.y + 1, label_width, body_height),
            plot: Rect::new(b.x + label_width, b.y + 1, b.width - label_width, body_height),
            axis: Rect::new(b.x + label_width, b.y + 1 + body_height, b.width - label_width, b.height.min(2) / 2),
        }
    }

    /// Logical pixels per terminal row.
    fn row_height(&self) -> f64 {
        self.config.pixels_per_column * 2.0
    }

    /// Rebuild the scene for the current bounds.
    ///
    /// `years` are the years the user can step through with ←/→.
    pub fn update(&mut self, input: &TimelineInput<'_>, years: Vec<i32>) {
        let plot = self.areas().plot;
        let width = f64::from(plot.width) * self.config.pixels_per_column;
        let height = f64::from(plot.height) * self.row_height();
        self.scene = Some(TimelineScene::build(input, &self.config, width, height));
        // Bar indices are per scene; look again under the pointer.
        if let Some((_, (x, y))) = self.hover {
            self.hover = self.bar_at(x, y).map(|index| (index, (x, y)));
        }
        self.years = years;
        self.today = Some(input.now.date());
        self.dirty = true;
    }

    /// The last scene built.
    pub const fn scene(&self) -> Option<&TimelineScene> {
        self.scene.as_ref()
    }

    /// Displayed year, once a scene exists.
    pub fn year(&self) -> Option<i32> {
        self.scene.as_ref().map(|scene| scene.year)
    }

    /// Bar under the pointer, if any.
    pub fn hovered_bar(&self) -> Option<&EventBar> {
        let (index, _) = self.hover?;
        self.scene.as_ref()?.bars.get(index)
    }

    /// Terminal cell at the middle of a bar.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bar_cell(&self, bar: &EventBar) -> Option<(u16, u16)> {
        let plot = self.areas().plot;
        let col = ((bar.x + bar.width / 2.0) / self.config.pixels_per_column).floor();
        let row = (((bar.top + bar.bottom) / 2.0) / self.row_height()).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let cell = (plot.x.checked_add(col as u16)?, plot.y.checked_add(row as u16)?);
        plot.contains(cell.0, cell.1).then_some(cell)
    }

    fn bar_at(&self, x: u16, y: u16) -> Option<usize> {
        let plot = self.areas().plot;
        if !plot.contains(x, y) {
            return None;
        }
        let scene = self.scene.as_ref()?;
        let lx = (f64::from(x - plot.x) + 0.5) * self.config.pixels_per_column;
        let ly = (f64::from(y - plot.y) + 0.5) * self.row_height();
        let hit = scene.hit_test(lx, ly)?;
        scene.bars.iter().position(|bar| bar.key == hit.key)
    }

    fn step_year(&self, delta: i32, callbacks: &mut dyn ViewCallbacks) -> bool {
        let Some(current) = self.year() else {
            return false;
        };
        let target = if delta < 0 {
            self.years.iter().rev().find(|&&year| year < current)
        } else {
            self.years.iter().find(|&&year| year > current)
        };
        match target {
            Some(&year) => {
                callbacks.on_select_year(year);
                true
            }
            None => false,
        }
    }

    /// Row inside the lane for a bar's name, offset by its stack level.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn label_row(&self, bar: &EventBar, plot: Rect) -> u16 {
        let row_height = self.row_height();
        let first = (bar.top / row_height).ceil().max(0.0) as u16;
        let last = ((bar.bottom / row_height).ceil() as u16).saturating_sub(1).max(first);
        let rows = usize::from(last - first + 1);
        let offset = u16::try_from(bar.level % rows).unwrap_or(0);
        plot.y + first + offset
    }

    fn paint(&self, scene: &TimelineScene, plot: Rect) -> PixelCanvas {
        let theme = &self.theme;
        let ppc = self.config.pixels_per_column;
        let height = f64::from(plot.height) * 2.0;
        let mut canvas = PixelCanvas::for_area(plot, theme.background);

        for tick in &scene.months {
            let x = tick.x / ppc;
            canvas.line((x, 0.0), (x, height - 1.0), theme.guide, None);
        }
        for lane in &scene.lanes {
            let y = (lane.lane_top + lane.lane_bottom) / 2.0 / ppc;
            canvas.line((0.0, y), (f64::from(plot.width) - 1.0, y), theme.guide, Some((1.0, 3.0)));
        }

        let hovered = self.hovered_bar().map(|bar| bar.key);
        for bar in &scene.bars {
            let alpha = if Some(bar.key) == hovered {
                1.0
            } else {
                self.config.bar_opacity
            };
            canvas.fill_rect(bar.x / ppc, bar.top / ppc, bar.right() / ppc, bar.bottom / ppc, bar.color, alpha);
        }

        if let Some(x) = scene.today_x {
            let x = x / ppc;
            canvas.line((x, 0.0), (x, height - 1.0), theme.today, Some((2.0, 2.0)));
        }
        canvas
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_text(&self, scene: &TimelineScene, buffer: &mut Buffer, areas: &Areas) {
        let theme = &self.theme;
        let ppc = self.config.pixels_per_column;
        let plot = areas.plot;
        let column = |x: f64| i32::from(plot.x) + (x / ppc).floor() as i32;

        let nav = format!("◀ {} ▶", scene.year);
        buffer.draw_text(
            areas.header.x,
            areas.header.y,
            &nav,
            theme.text_style().with_modifiers(Modifiers::BOLD),
            areas.labels.width.max(10),
        );
        if let (Some(x), Some(today)) = (scene.today_x, self.today) {
            let label = today.format("%-d.%-m.%Y").to_string();
            let header = Rect::new(plot.x, areas.header.y, plot.width, 1);
            buffer.draw_text_centered(column(x), areas.header.y, &label, TextStyle::overlay(theme.today), header);
        }

        let row_height = self.row_height();
        for lane in &scene.lanes {
            let row = areas.labels.y + (((lane.lane_top + lane.lane_bottom) / 2.0) / row_height).floor() as u16;
            if row < areas.labels.bottom() {
                buffer.draw_text(
                    areas.labels.x,
                    row,
                    &lane.category,
                    theme.text_style(),
                    areas.labels.width.saturating_sub(1),
                );
            }
        }

        for bar in &scene.bars {
            let row = self.label_row(bar, plot);
            let start = column(bar.x).max(i32::from(plot.x));
            let Ok(start) = u16::try_from(start) else {
                continue;
            };
            if row < plot.bottom() && start < plot.right() {
                let style = TextStyle::overlay(theme.text).with_modifiers(Modifiers::BOLD);
                buffer.draw_text(start, row, &bar.name, style, plot.right() - start);
            }
        }

        if !areas.axis.is_empty() {
            for tick in &scene.months {
                let Ok(col) = u16::try_from(column(tick.x)) else {
                    continue;
                };
                if col < areas.axis.right() {
                    buffer.draw_text(col, areas.axis.y, &tick.label, theme.muted_style(), areas.axis.right() - col);
                }
            }
        }
    }
}

impl Widget for Timeline {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.hover = None;
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        let area = self.bounds.intersection(&buffer.area());
        if area.is_empty() {
            return;
        }
        buffer.fill_rect(area, Cell::new(' ').with_bg(self.theme.background));
        let Some(scene) = &self.scene else {
            return;
        };
        let areas = self.areas();
        if areas.plot.is_empty() {
            return;
        }

        self.paint(scene, areas.plot).blit(buffer, (areas.plot.x, areas.plot.y));
        self.draw_text(scene, buffer, &areas);

        if scene.bars.is_empty() {
            buffer.draw_text_centered(
                i32::from(areas.plot.x + areas.plot.width / 2),
                areas.plot.y + areas.plot.height / 2,
                "Ei tapahtumia tälle vuodelle",
                self.theme.muted_style(),
                areas.plot,
            );
        }

        if let (Some(bar), Some((_, at))) = (self.hovered_bar(), self.hover) {
            let dates = format!("{} - {}", bar.start.format("%-d.%-m.%Y"), bar.end.format("%-d.%-m.%Y"));
            Tooltip::new(at, bar.name.clone())
                .line(format!("Kategoria: {}", bar.category))
                .line(dates)
                .line(bar.details.clone())
                .render(buffer, area, &self.theme);
        }
    }

    fn handle_input(&mut self, event: &InputEvent, callbacks: &mut dyn ViewCallbacks) -> bool {
        match event {
            InputEvent::Key { code: KeyCode::Left, .. } => self.step_year(-1, callbacks),
            InputEvent::Key { code: KeyCode::Right, .. } => self.step_year(1, callbacks),
            InputEvent::MouseMove(mouse) => {
                let hover = self.bar_at(mouse.x, mouse.y).map(|index| (index, (mouse.x, mouse.y)));
                if hover.map(|h| h.0) != self.hover.map(|h| h.0) {
                    self.dirty = true;
                }
                self.hover = hover;
                self.bounds.contains(mouse.x, mouse.y)
            }
            InputEvent::MouseDown(mouse) if mouse.button == Some(MouseButton::Left) => {
                let header = self.areas().header;
                if mouse.y != header.y || !header.contains(mouse.x, mouse.y) {
                    return false;
                }
                // "◀ 2025 ▶": the arrows are the first and last columns.
                let nav_width = self.year().map_or(0, |year| format!("◀ {year} ▶").width());
                let offset = usize::from(mouse.x - header.x);
                if offset == 0 {
                    self.step_year(-1, callbacks)
                } else if offset + 1 == nav_width {
                    self.step_year(1, callbacks)
                } else {
                    false
                }
            }
            InputEvent::Resize { .. } | InputEvent::FocusLost => {
                self.hover = None;
                false
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
