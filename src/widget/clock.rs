//! Radial clock view.
//!
//! Rasterizes a [`ClockScene`] onto a half-block canvas and maps pointer
//! cells back to clock units for hit-testing. The scene is rebuilt by
//! [`RadialClock::update`] on every pass; only the pointer state survives.

use super::theme::{month_name, Theme};
use super::tooltip::Tooltip;
use super::traits::{ViewCallbacks, Widget};
use crate::actor::{InputEvent, MouseButton};
use crate::buffer::{Buffer, Cell, Modifiers, TextStyle};
use crate::canvas::PixelCanvas;
use crate::layout::projection::to_cartesian;
use crate::layout::radial::{ClockGeometry, ClockInput, ClockScene, EventArc};
use crate::layout::Rect;
use chrono::NaiveDateTime;
use std::f64::consts::TAU;
use unicode_width::UnicodeWidthStr;

/// Opacity of the category ring tint.
const RING_TINT: f64 = 0.1;
/// Length of a week tick in clock units.
const WEEK_TICK: f64 = 10.0;
/// Canvas radius (pixels) from which month names are written in full.
const FULL_LABELS_FROM: f64 = 24.0;

/// Maps between terminal cells and clock units for one area.
///
/// A cell is one pixel wide and two pixels tall. The clock's `size` square
/// is scaled to fit the smaller canvas dimension and centred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockViewport {
    area: Rect,
    scale: f64,
}

impl ClockViewport {
    /// Viewport of a clock `size` units across drawn into `area`.
    pub fn new(area: Rect, size: f64) -> Self {
        let width = f64::from(area.width);
        let height = f64::from(area.height) * 2.0;
        Self {
            area,
            scale: width.min(height) / size.max(1.0),
        }
    }

    /// Pixels per clock unit.
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Canvas pixel of the clock centre.
    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.area.width) / 2.0, f64::from(self.area.height))
    }

    /// Canvas pixel of a point in clock units.
    pub fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let (cx, cy) = self.center();
        (x.mul_add(self.scale, cx), y.mul_add(self.scale, cy))
    }

    /// Clock units at the centre of a terminal cell.
    pub fn cell_to_units(&self, col: u16, row: u16) -> (f64, f64) {
        let px = f64::from(col.saturating_sub(self.area.x)) + 0.5;
        let py = f64::from(row.saturating_sub(self.area.y)).mul_add(2.0, 1.0);
        let (cx, cy) = self.center();
        ((px - cx) / self.scale, (py - cy) / self.scale)
    }

    /// Terminal cell under a point in clock units; `None` above or below the area.
    ///
    /// The column may fall outside the area; text drawing clips it.
    #[allow(clippy::cast_possible_truncation)]
    pub fn units_to_cell(&self, point: (f64, f64)) -> Option<(i32, u16)> {
        let (px, py) = self.to_pixel(point);
        if py < 0.0 || py >= f64::from(self.area.height) * 2.0 {
            return None;
        }
        let col = i32::from(self.area.x) + px.floor() as i32;
        let row = u16::try_from((py / 2.0).floor() as i64).ok()?;
        Some((col, self.area.y + row))
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Hover {
    #[default]
    None,
    Arc {
        index: usize,
        at: (u16, u16),
    },
    Month(u32),
}

/// The year clock.
#[derive(Debug)]
pub struct RadialClock {
    bounds: Rect,
    geometry: ClockGeometry,
    theme: Theme,
    scene: Option<ClockScene>,
    hover: Hover,
    dirty: bool,
}

impl RadialClock {
    /// An empty clock; call [`RadialClock::update`] before rendering.
    pub fn new(bounds: Rect, geometry: ClockGeometry, theme: Theme) -> Self {
        Self {
            bounds,
            geometry,
            theme,
            scene: None,
            hover: Hover::None,
            dirty: true,
        }
    }

    /// Rebuild the scene from a fresh snapshot.
    pub fn update(&mut self, input: &ClockInput<'_>) {
        self.scene = Some(ClockScene::build(input, &self.geometry));
        // Arc indices are per scene; look again under the pointer.
        if let Hover::Arc { at: (x, y), .. } = self.hover {
            self.hover = self.hover_at(x, y);
        }
        self.dirty = true;
    }

    /// Move the today indicator without touching anything else.
    pub fn update_now(&mut self, now: NaiveDateTime) {
        if let Some(scene) = &mut self.scene {
            scene.set_now(now);
            self.dirty = true;
        }
    }

    /// The last scene built.
    pub const fn scene(&self) -> Option<&ClockScene> {
        self.scene.as_ref()
    }

    /// Mapping for the current bounds.
    pub fn viewport(&self) -> ClockViewport {
        ClockViewport::new(self.bounds, self.geometry.size)
    }

    /// Arc under the pointer, if any.
    pub fn hovered_arc(&self) -> Option<&EventArc> {
        match self.hover {
            Hover::Arc { index, .. } => self.scene.as_ref()?.arcs.get(index),
            _ => None,
        }
    }

    /// Month whose label is under the pointer, if any.
    pub const fn hovered_month(&self) -> Option<u32> {
        match self.hover {
            Hover::Month(month0) => Some(month0),
            _ => None,
        }
    }

    fn month_label(&self, month0: u32) -> String {
        let name = month_name(month0);
        let radius_px = self.geometry.radius() * self.viewport().scale();
        if radius_px >= FULL_LABELS_FROM {
            name.to_string()
        } else {
            name.chars().take(3).collect()
        }
    }

    fn text_area(center: i32, row: u16, text: &str, clip: Rect) -> Option<Rect> {
        let width = i32::try_from(text.width()).ok()?;
        let start = (center - width / 2).max(i32::from(clip.x));
        let start = u16::try_from(start).ok()?;
        let area = Rect::new(start, row, u16::try_from(width).ok()?, 1).intersection(&clip);
        (!area.is_empty()).then_some(area)
    }

    /// Cells covered by the label of month `month0`.
    pub fn month_label_area(&self, month0: u32) -> Option<Rect> {
        let scene = self.scene.as_ref()?;
        let spoke = scene.months.iter().find(|spoke| spoke.month0 == month0)?;
        let (col, row) = self
            .viewport()
            .units_to_cell(self.geometry.month_label_point(spoke.angle))?;
        Self::text_area(col, row, &self.month_label(month0), self.bounds)
    }

    /// Cells covered by the "open agenda" affordance of month `month0`.
    ///
    /// Placed at the agenda offset, but never on the label's own row.
    pub fn agenda_button_area(&self, month0: u32) -> Option<Rect> {
        let scene = self.scene.as_ref()?;
        let spoke = scene.months.iter().find(|spoke| spoke.month0 == month0)?;
        let label = self.month_label_area(month0)?;
        let view = self.viewport();
        let (col, mut row) = view.units_to_cell(self.geometry.agenda_button_point(spoke.angle))?;
        if row == label.y {
            let upper_half = spoke.angle < TAU / 4.0 || spoke.angle > 3.0 * TAU / 4.0;
            row = if upper_half {
                row.checked_sub(1)?
            } else {
                row + 1
            };
        }
        Self::text_area(col, row, AGENDA_LABEL, self.bounds)
    }

    fn hover_at(&self, x: u16, y: u16) -> Hover {
        let Some(scene) = &self.scene else {
            return Hover::None;
        };
        if !self.bounds.contains(x, y) {
            return Hover::None;
        }
        if let Hover::Month(month0) = self.hover {
            if self.agenda_button_area(month0).is_some_and(|area| area.contains(x, y)) {
                return self.hover;
            }
        }
        for spoke in &scene.months {
            if self.month_label_area(spoke.month0).is_some_and(|area| area.contains(x, y)) {
                return Hover::Month(spoke.month0);
            }
        }
        let (ux, uy) = self.viewport().cell_to_units(x, y);
        scene
            .hit_test(ux, uy)
            .and_then(|hit| scene.arcs.iter().position(|arc| arc.key == hit.key))
            .map_or(Hover::None, |index| Hover::Arc { index, at: (x, y) })
    }

    fn set_hover(&mut self, hover: Hover) {
        if hover != self.hover {
            self.hover = hover;
            self.dirty = true;
        }
    }

    fn paint(&self, scene: &ClockScene, area: Rect) -> PixelCanvas {
        let theme = &self.theme;
        let view = ClockViewport::new(area, self.geometry.size);
        let scale = view.scale();
        let (cx, cy) = view.center();
        let at = |angle: f64, radius: f64| view.to_pixel(to_cartesian(angle, radius));
        let hovered = self.hovered_arc().map(|arc| arc.key);

        let mut canvas = PixelCanvas::for_area(area, theme.background);
        canvas.fill_circle(cx, cy, scene.center_radius * scale, theme.surface, 1.0);

        for ring in &scene.rings {
            canvas.fill_annular_sector(
                cx,
                cy,
                ring.band.inner_radius * scale,
                ring.band.outer_radius * scale,
                0.0,
                TAU,
                ring.color,
                RING_TINT,
            );
        }

        for arc in &scene.arcs {
            let color = if Some(arc.key) == hovered {
                arc.color.brighter(0.6)
            } else {
                arc.color
            };
            canvas.fill_annular_sector(
                cx,
                cy,
                arc.inner_radius * scale,
                arc.outer_radius * scale,
                arc.start_angle,
                arc.end_angle,
                color,
                1.0,
            );
        }

        for spoke in &scene.months {
            canvas.line((cx, cy), at(spoke.angle, scene.radius), theme.guide, None);
        }
        canvas.stroke_circle(cx, cy, scene.radius * scale, 1.0, theme.guide);
        for week in &scene.weeks {
            canvas.line(
                at(week.angle, scene.radius),
                at(week.angle, scene.radius + WEEK_TICK),
                theme.guide,
                None,
            );
        }

        let today = scene.today;
        if today.visible {
            canvas.line((cx, cy), at(today.angle, today.ray_length), theme.today, Some((2.0, 2.0)));
            let (dx, dy) = at(today.angle, today.dot_distance);
            canvas.fill_circle(dx, dy, (self.geometry.today_dot_radius * scale).max(0.8), theme.today, 1.0);
        }
        canvas
    }

    fn draw_labels(&self, scene: &ClockScene, buffer: &mut Buffer, area: Rect) {
        let view = ClockViewport::new(area, self.geometry.size);
        let theme = &self.theme;

        for spoke in &scene.months {
            let label = self.month_label(spoke.month0);
            if let Some((col, row)) = view.units_to_cell(self.geometry.month_label_point(spoke.angle)) {
                let style = if self.hovered_month() == Some(spoke.month0) {
                    TextStyle::overlay(theme.accent).with_modifiers(Modifiers::BOLD)
                } else {
                    theme.text_style().with_modifiers(Modifiers::BOLD)
                };
                buffer.draw_text_centered(col, row, &label, style, area);
            }
        }

        for ring in &scene.rings {
            let mid = (ring.band.inner_radius + ring.band.outer_radius) / 2.0;
            if let Some((col, row)) = view.units_to_cell(to_cartesian(TAU / 24.0, mid)) {
                let style = TextStyle::overlay(ring.color.brighter(1.0));
                buffer.draw_text_centered(col, row, &ring.band.category, style, area);
            }
        }

        // Week numbers need roughly two columns each around the rim.
        let rim = (self.geometry.radius() + self.geometry.week_tick_offset) * view.scale();
        let step = if rim >= 60.0 {
            1
        } else if rim >= 30.0 {
            4
        } else {
            0
        };
        if step > 0 {
            for week in scene.weeks.iter().filter(|week| week.number % step == 0) {
                let point = to_cartesian(week.angle, self.geometry.radius() + self.geometry.week_tick_offset);
                if let Some((col, row)) = view.units_to_cell(point) {
                    buffer.draw_text_centered(col, row, &week.number.to_string(), theme.muted_style(), area);
                }
            }
        }
    }
}

const AGENDA_LABEL: &str = " Näytä agenda ";

impl Widget for RadialClock {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.hover = Hover::None;
        self.dirty = true;
    }

    fn render(&self, buffer: &mut Buffer) {
        let area = self.bounds.intersection(&buffer.area());
        if area.is_empty() {
            return;
        }
        let Some(scene) = &self.scene else {
            buffer.fill_rect(area, Cell::new(' ').with_bg(self.theme.background));
            return;
        };

        self.paint(scene, area).blit(buffer, (area.x, area.y));
        self.draw_labels(scene, buffer, area);

        match self.hover {
            Hover::Arc { index, at } => {
                if let Some(arc) = scene.arcs.get(index) {
                    Tooltip::new(at, arc.name.clone())
                        .line(format!("Kategoria: {}", arc.category))
                        .line("Klikkaa nähdäksesi lisätiedot")
                        .render(buffer, area, &self.theme);
                }
            }
            Hover::Month(month0) => {
                if let Some(button) = self.agenda_button_area(month0) {
                    let style = TextStyle::new(crate::buffer::Rgb::WHITE, self.theme.accent);
                    buffer.draw_text(button.x, button.y, AGENDA_LABEL, style, button.width);
                }
            }
            Hover::None => {}
        }
    }

    fn handle_input(&mut self, event: &InputEvent, callbacks: &mut dyn ViewCallbacks) -> bool {
        match event {
            InputEvent::MouseMove(mouse) => {
                let hover = self.hover_at(mouse.x, mouse.y);
                self.set_hover(hover);
                self.bounds.contains(mouse.x, mouse.y)
            }
            InputEvent::MouseDown(mouse) if mouse.button == Some(MouseButton::Left) => {
                let hover = self.hover_at(mouse.x, mouse.y);
                self.set_hover(hover);
                match hover {
                    Hover::Arc { index, .. } => {
                        if let Some(arc) = self.scene.as_ref().and_then(|scene| scene.arcs.get(index)) {
                            log::debug!("event=select_event module=clock status=ok id={}", arc.id);
                            callbacks.on_select_event(&arc.id);
                            callbacks.on_open_event_detail(&arc.id);
                        }
                        true
                    }
                    Hover::Month(month0) => {
                        callbacks.on_select_month(month0);
                        true
                    }
                    Hover::None => false,
                }
            }
            InputEvent::Resize { .. } | InputEvent::FocusLost => {
                self.set_hover(Hover::None);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::MouseEvent;
    use crate::layout::{StackOrder, YearSpan};
    use crate::model::event::test_event;
    use crate::model::{CategorySet, Event};
    use crate::widget::ViewSignal;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn rebuild(clock: &mut RadialClock, events: &[Event]) {
        let categories = CategorySet::from_names(["Talous"]);
        let selected: BTreeSet<String> = categories.names().map(String::from).collect();
        clock.update(&ClockInput {
            events,
            categories: &categories,
            selected: &selected,
            span: YearSpan::calendar(2025),
            now: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            order: StackOrder::Insertion,
        });
    }

    fn clock(events: &[Event], bounds: Rect) -> RadialClock {
        let mut clock = RadialClock::new(bounds, ClockGeometry::default(), Theme::default());
        rebuild(&mut clock, events);
        clock
    }

    fn spring() -> Vec<Event> {
        vec![test_event("spring", "Talous", (3, 1), (5, 31))]
    }

    fn mid_cell(clock: &RadialClock, arc: &EventArc) -> (u16, u16) {
        let mid = (arc.inner_radius + arc.outer_radius) / 2.0;
        let (col, row) = clock
            .viewport()
            .units_to_cell(to_cartesian(arc.mid_angle(), mid))
            .unwrap();
        (u16::try_from(col).unwrap(), row)
    }

    #[test]
    fn test_viewport_centre_round_trip() {
        let view = ClockViewport::new(Rect::new(0, 0, 200, 100), 1000.0);
        assert!((view.scale() - 0.2).abs() < 1e-12);
        let (x, y) = view.cell_to_units(100, 50);
        assert!(x.abs() <= 2.5 && y.abs() <= 5.0);
        assert_eq!(view.units_to_cell((0.0, 0.0)), Some((100, 50)));
        assert_eq!(view.units_to_cell((0.0, 600.0)), None);
    }

    #[test]
    fn test_render_draws_arc_and_labels() {
        let events = spring();
        let clock = clock(&events, Rect::new(0, 0, 200, 100));
        let mut buffer = Buffer::new(200, 100);
        clock.render(&mut buffer);

        let arc = &clock.scene().unwrap().arcs[0];
        let (x, y) = mid_cell(&clock, arc);
        let cell = buffer.get(x, y).unwrap();
        assert!(cell.fg() == arc.color || cell.bg() == arc.color);

        let text: String = (0..100).map(|row| buffer.row_text(row)).collect();
        assert!(text.contains("Tammikuu"));
        assert!(text.contains("Talous"));
    }

    #[test]
    fn test_click_arc_selects_and_opens() {
        let events = spring();
        let mut clock = clock(&events, Rect::new(0, 0, 200, 100));
        let arc = clock.scene().unwrap().arcs[0].clone();
        let (x, y) = mid_cell(&clock, &arc);

        let mut signals: Vec<ViewSignal> = Vec::new();
        assert!(clock.handle_input(&InputEvent::MouseDown(MouseEvent::left(x, y)), &mut signals));
        assert_eq!(
            signals,
            vec![
                ViewSignal::SelectEvent(arc.id.clone()),
                ViewSignal::OpenEventDetail(arc.id.clone())
            ]
        );
    }

    #[test]
    fn test_hover_shows_tooltip() {
        let events = spring();
        let mut clock = clock(&events, Rect::new(0, 0, 200, 100));
        let arc = clock.scene().unwrap().arcs[0].clone();
        let (x, y) = mid_cell(&clock, &arc);
        clock.clear_redraw();

        let mut signals: Vec<ViewSignal> = Vec::new();
        clock.handle_input(&InputEvent::MouseMove(MouseEvent::at(x, y)), &mut signals);
        assert!(signals.is_empty());
        assert!(clock.needs_redraw());
        assert_eq!(clock.hovered_arc().map(|a| a.id.clone()), Some(arc.id));

        let mut buffer = Buffer::new(200, 100);
        clock.render(&mut buffer);
        let text: String = (0..100).map(|row| buffer.row_text(row)).collect();
        assert!(text.contains("event spring"));
        assert!(text.contains("Kategoria: Talous"));
    }

    #[test]
    fn test_hover_follows_event_across_rebuilds() {
        let spring = test_event("spring", "Talous", (3, 1), (5, 31));
        let autumn = test_event("autumn", "Talous", (9, 1), (11, 30));
        let mut clock = clock(&[spring.clone(), autumn.clone()], Rect::new(0, 0, 200, 100));
        let arc = clock.scene().unwrap().arcs[0].clone();
        let (x, y) = mid_cell(&clock, &arc);
        let mut signals: Vec<ViewSignal> = Vec::new();
        clock.handle_input(&InputEvent::MouseMove(MouseEvent::at(x, y)), &mut signals);
        assert_eq!(clock.hovered_arc().map(|a| a.id.as_str()), Some("spring"));

        // Reordered: the hovered event moves to another index.
        rebuild(&mut clock, &[autumn.clone(), spring]);
        assert_eq!(clock.hovered_arc().map(|a| a.id.as_str()), Some("spring"));

        // Removed: nothing else is under the pointer.
        rebuild(&mut clock, &[autumn]);
        assert_eq!(clock.hovered_arc(), None);
    }

    #[test]
    fn test_month_label_selects_month() {
        let mut clock = clock(&[], Rect::new(0, 0, 200, 100));
        let label = clock.month_label_area(3).unwrap();

        let mut signals: Vec<ViewSignal> = Vec::new();
        clock.handle_input(&InputEvent::MouseMove(MouseEvent::at(label.x, label.y)), &mut signals);
        assert_eq!(clock.hovered_month(), Some(3));

        let button = clock.agenda_button_area(3).unwrap();
        assert_ne!(button.y, label.y);
        clock.handle_input(&InputEvent::MouseDown(MouseEvent::left(button.x + 1, button.y)), &mut signals);
        assert_eq!(signals, vec![ViewSignal::SelectMonth(3)]);
    }

    #[test]
    fn test_click_on_empty_space_is_ignored() {
        let mut clock = clock(&[], Rect::new(0, 0, 200, 100));
        let mut signals: Vec<ViewSignal> = Vec::new();
        assert!(!clock.handle_input(&InputEvent::MouseDown(MouseEvent::left(100, 50)), &mut signals));
        assert!(signals.is_empty());
    }

    #[test]
    fn test_update_now_only_moves_today() {
        let events = spring();
        let mut clock = clock(&events, Rect::new(0, 0, 80, 40));
        let before = clock.scene().unwrap().clone();
        clock.update_now(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap().and_hms_opt(9, 0, 0).unwrap());
        let after = clock.scene().unwrap();
        assert!(after.today.angle > before.today.angle);
        assert_eq!(after.arcs, before.arcs);
        assert_eq!(after.rings, before.rings);
    }

    #[test]
    fn test_small_area_abbreviates_months() {
        let clock = clock(&[], Rect::new(0, 0, 30, 15));
        assert_eq!(clock.month_label(0), "Tam");
        let mut buffer = Buffer::new(30, 15);
        clock.render(&mut buffer);
    }
}
