//! Radial layout: the year clock as pure geometry.
//!
//! All lengths are clock units: the clock is `size` units across with the
//! outer circle at `size / 2 - margin`. Points are offsets from the centre
//! with y growing downward.

use super::overlap::{compute_overlap_levels_with, EventKey, StackOrder};
use super::projection::{angle_at, to_cartesian, YearSpan};
use super::rings::{allocate_rings, RingBand, RingConfig};
use super::LayoutIssue;
use crate::buffer::Rgb;
use crate::model::{CategorySet, Event, EventId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::TAU;

/// Clock dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockGeometry {
    /// Full width of the clock.
    pub size: f64,
    /// Space between the outer circle and the edge, used by labels.
    pub margin: f64,
    /// Radial thickness of each category ring.
    pub ring_width: f64,
    /// Gap between rings.
    pub ring_spacing: f64,
    /// Gap between the outer circle and the outermost ring.
    pub inner_offset: f64,
    /// Radius of the centre disc as a fraction of the outer radius.
    pub center_ratio: f64,
    /// Distance of week numbers beyond the outer circle.
    pub week_tick_offset: f64,
    /// Distance of month labels beyond the outer circle.
    pub month_label_offset: f64,
    /// Distance of the agenda affordance beyond the outer circle.
    pub agenda_button_offset: f64,
    /// How far the today ray extends past the outer circle.
    pub today_ray_extra: f64,
    /// How far inside the outer circle the today dot sits.
    pub today_dot_inset: f64,
    /// Radius of the today dot.
    pub today_dot_radius: f64,
    /// Shortest arc, measured along its mid radius.
    pub min_arc_length: f64,
}

impl Default for ClockGeometry {
    fn default() -> Self {
        Self {
            size: 1000.0,
            margin: 140.0,
            ring_width: 45.0,
            ring_spacing: 15.0,
            inner_offset: 20.0,
            center_ratio: 0.65,
            week_tick_offset: 45.0,
            month_label_offset: 85.0,
            agenda_button_offset: 115.0,
            today_ray_extra: 50.0,
            today_dot_inset: 10.0,
            today_dot_radius: 3.0,
            min_arc_length: 10.0,
        }
    }
}

impl ClockGeometry {
    /// Radius of the outer circle.
    pub fn radius(&self) -> f64 {
        self.size / 2.0 - self.margin
    }

    /// Ring allocation parameters for this clock.
    pub fn ring_config(&self) -> RingConfig {
        RingConfig {
            base_radius: self.radius(),
            ring_width: self.ring_width,
            ring_spacing: self.ring_spacing,
            inner_offset: self.inner_offset,
        }
    }

    /// Where the label of a month boundary sits.
    pub fn month_label_point(&self, angle: f64) -> (f64, f64) {
        to_cartesian(angle, self.radius() + self.month_label_offset)
    }

    /// Where the agenda affordance of a month sits.
    pub fn agenda_button_point(&self, angle: f64) -> (f64, f64) {
        to_cartesian(angle, self.radius() + self.agenda_button_offset)
    }
}

/// Everything one clock pass reads.
#[derive(Debug, Clone, Copy)]
pub struct ClockInput<'a> {
    /// Event snapshot in insertion order.
    pub events: &'a [Event],
    /// Project categories with their colours.
    pub categories: &'a CategorySet,
    /// Categories currently shown.
    pub selected: &'a BTreeSet<String>,
    /// The displayed year.
    pub span: YearSpan,
    /// Current wall-clock time, for the today ray.
    pub now: NaiveDateTime,
    /// Stacking order for overlapping events.
    pub order: StackOrder,
}

/// A category ring with its colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockRing {
    /// Radii and category.
    pub band: RingBand,
    /// Assigned colour.
    pub color: Rgb,
}

/// One event drawn as an annular sector.
#[derive(Debug, Clone, PartialEq)]
pub struct EventArc {
    /// Position of the event in the input snapshot.
    pub key: EventKey,
    /// Event id.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
    /// Raw stack level.
    pub level: usize,
    /// Start angle, clamped to the year.
    pub start_angle: f64,
    /// End angle, clamped to the year.
    pub end_angle: f64,
    /// Inner radius of the sub-band.
    pub inner_radius: f64,
    /// Outer radius of the sub-band.
    pub outer_radius: f64,
    /// Fill colour.
    pub color: Rgb,
}

impl EventArc {
    /// Whether the polar point (`r`, `angle`) lies on the arc.
    pub fn contains(&self, r: f64, angle: f64) -> bool {
        r >= self.inner_radius && r <= self.outer_radius && angle >= self.start_angle && angle <= self.end_angle
    }

    /// Angle halfway along the arc.
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// A month boundary spoke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSpoke {
    /// Month, 0 = January.
    pub month0: u32,
    /// Angle of the first day of the month.
    pub angle: f64,
}

/// A week number position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekTick {
    /// Week number, 1..=52.
    pub number: u32,
    /// Angle of the tick.
    pub angle: f64,
}

/// The "today" ray and dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TodayMarker {
    /// Angle of the current instant.
    pub angle: f64,
    /// Length of the ray from the centre.
    pub ray_length: f64,
    /// Distance of the dot from the centre.
    pub dot_distance: f64,
    /// Whether today falls inside the displayed year.
    pub visible: bool,
}

/// Geometry of one clock pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockScene {
    /// Outer circle radius.
    pub radius: f64,
    /// Centre disc radius.
    pub center_radius: f64,
    /// Category rings, outermost first.
    pub rings: Vec<ClockRing>,
    /// Event arcs in draw order (later arcs on top).
    pub arcs: Vec<EventArc>,
    /// Twelve month spokes.
    pub months: Vec<MonthSpoke>,
    /// Fifty-two week ticks.
    pub weeks: Vec<WeekTick>,
    /// Today indicator.
    pub today: TodayMarker,
    /// Events that could not be drawn as specified.
    pub issues: Vec<LayoutIssue>,
    span: YearSpan,
    geometry: ClockGeometry,
}

impl ClockScene {
    /// Lay out one pass. Pure apart from logging.
    pub fn build(input: &ClockInput<'_>, geometry: &ClockGeometry) -> Self {
        let radius = geometry.radius();
        let names: Vec<&str> = input.categories.names().collect();
        let rings: Vec<ClockRing> = allocate_rings(&names, &geometry.ring_config())
            .into_iter()
            .map(|band| ClockRing {
                color: input.categories.color_of(&band.category).unwrap_or(Rgb::DEFAULT_FG),
                band,
            })
            .collect();

        let mut issues = Vec::new();
        let mut candidates: Vec<(usize, &Event)> = Vec::new();
        for (index, event) in input.events.iter().enumerate() {
            if !input.selected.contains(&event.category) {
                continue;
            }
            if event.is_well_formed() {
                candidates.push((index, event));
            } else {
                issues.push(LayoutIssue::MalformedEvent { id: event.id.clone() });
            }
        }

        let visible: Vec<&Event> = candidates.iter().map(|(_, event)| *event).collect();
        let levels = compute_overlap_levels_with(&visible, input.order);
        for (category, depth) in levels.degenerate_categories() {
            issues.push(LayoutIssue::DegenerateLayout {
                category: category.to_string(),
                depth,
            });
        }

        let mut arcs = Vec::with_capacity(candidates.len());
        for (position, (index, event)) in candidates.into_iter().enumerate() {
            let Some(ring) = rings.iter().find(|ring| ring.band.category == event.category) else {
                issues.push(LayoutIssue::UnknownCategory {
                    id: event.id.clone(),
                    category: event.category.clone(),
                });
                continue;
            };

            let level = levels.get(EventKey(position)).unwrap_or(0);
            let (inner_radius, outer_radius) = ring.band.sub_band(level);
            let mid_radius = ((inner_radius + outer_radius) / 2.0).max(1.0);
            let Some((start_angle, end_angle)) = clamp_arc(
                input.span.angle_of(event.start_date),
                input.span.angle_of(event.end_date),
                geometry.min_arc_length / mid_radius,
            ) else {
                issues.push(LayoutIssue::OutsideSpan { id: event.id.clone() });
                continue;
            };

            arcs.push(EventArc {
                key: EventKey(index),
                id: event.id.clone(),
                name: event.name.clone(),
                category: event.category.clone(),
                start: event.start_date,
                end: event.end_date,
                level,
                start_angle,
                end_angle,
                inner_radius,
                outer_radius,
                color: ring.color,
            });
        }

        for issue in &issues {
            issue.log("clock");
        }
        log::debug!(
            "event=layout_pass module=clock status=ok year={} rings={} arcs={} issues={}",
            input.span.year(),
            rings.len(),
            arcs.len(),
            issues.len()
        );

        Self {
            radius,
            center_radius: radius * geometry.center_ratio,
            rings,
            arcs,
            months: month_spokes(&input.span),
            weeks: week_ticks(),
            today: today_marker(&input.span, geometry, input.now),
            issues,
            span: input.span,
            geometry: *geometry,
        }
    }

    /// Move the today indicator to `now`. Touches nothing else.
    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.today = today_marker(&self.span, &self.geometry, now);
    }

    /// The displayed year.
    pub const fn span(&self) -> YearSpan {
        self.span
    }

    /// Geometry the scene was built with.
    pub const fn geometry(&self) -> &ClockGeometry {
        &self.geometry
    }

    /// Topmost arc under a point (clock units from the centre).
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&EventArc> {
        let r = x.hypot(y);
        let angle = angle_at(x, y);
        self.arcs.iter().rev().find(|arc| arc.contains(r, angle))
    }

    /// Arc of the event with `id`, if drawn.
    pub fn arc(&self, id: &EventId) -> Option<&EventArc> {
        self.arcs.iter().find(|arc| &arc.id == id)
    }
}

/// Clamp to the year and widen to `min_angle`; `None` if fully outside.
fn clamp_arc(start: f64, end: f64, min_angle: f64) -> Option<(f64, f64)> {
    if end < 0.0 || start > TAU {
        return None;
    }
    let mut start = start.max(0.0);
    let mut end = end.min(TAU);
    if end - start < min_angle {
        end = (start + min_angle).min(TAU);
        start = (end - min_angle).max(0.0);
    }
    Some((start, end))
}

fn month_spokes(span: &YearSpan) -> Vec<MonthSpoke> {
    (0..12)
        .map(|month0| {
            let first = NaiveDate::from_ymd_opt(span.year(), month0 + 1, 1).unwrap_or(span.start());
            MonthSpoke {
                month0,
                angle: span.angle_of(first),
            }
        })
        .collect()
}

fn week_ticks() -> Vec<WeekTick> {
    (1..=52)
        .map(|number| WeekTick {
            number,
            angle: f64::from(number) / 52.0 * TAU,
        })
        .collect()
}

fn today_marker(span: &YearSpan, geometry: &ClockGeometry, now: NaiveDateTime) -> TodayMarker {
    let date = now.date();
    TodayMarker {
        angle: span.angle_of_instant(now).clamp(0.0, TAU),
        ray_length: geometry.radius() + geometry.today_ray_extra,
        dot_distance: geometry.radius() - geometry.today_dot_inset,
        visible: date >= span.start() && date <= span.end(),
    }
}
