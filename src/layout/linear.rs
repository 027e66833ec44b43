//! Linear layout: the timeline as pure geometry.
//!
//! Positions are logical pixels inside the plot area: x from the start of the
//! year, y from the top of the plot. One lane per category present in the
//! year; overlapping events share the lane and are drawn translucent.

use super::overlap::{compute_overlap_levels, EventKey};
use super::projection::YearSpan;
use super::rings::{allocate_lanes, LaneBand, LaneConfig};
use super::LayoutIssue;
use crate::buffer::Rgb;
use crate::model::{CategorySet, Event, EventId};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Timeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Narrowest bar, in logical pixels.
    pub min_bar_width: f64,
    /// Lane padding ratio.
    pub lane_padding: f64,
    /// Logical pixels per terminal column.
    pub pixels_per_column: f64,
    /// Bar opacity.
    pub bar_opacity: f64,
    /// Widest category label column, in terminal columns.
    pub label_column_width: u16,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_bar_width: 10.0,
            lane_padding: 0.3,
            pixels_per_column: 8.0,
            bar_opacity: 0.7,
            label_column_width: 18,
        }
    }
}

/// Everything one timeline pass reads.
#[derive(Debug, Clone, Copy)]
pub struct TimelineInput<'a> {
    /// Event snapshot in insertion order.
    pub events: &'a [Event],
    /// Project categories with their colours.
    pub categories: &'a CategorySet,
    /// Categories currently shown.
    pub selected: &'a BTreeSet<String>,
    /// Displayed year.
    pub year: i32,
    /// Current wall-clock time.
    pub now: NaiveDateTime,
}

/// One event drawn as a rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct EventBar {
    /// Position of the event in the input snapshot.
    pub key: EventKey,
    /// Event id.
    pub id: EventId,
    /// Event name.
    pub name: String,
    /// Category name.
    pub category: String,
    /// Description, shown on hover.
    pub details: String,
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
    /// Left edge.
    pub x: f64,
    /// Width, at least the configured minimum.
    pub width: f64,
    /// Lane top.
    pub top: f64,
    /// Lane bottom.
    pub bottom: f64,
    /// Stack level within the lane; only used to offset labels.
    pub level: usize,
    /// Fill colour.
    pub color: Rgb,
}

impl EventBar {
    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether a plot point falls on the bar.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.top && y <= self.bottom
    }
}

/// A month tick on the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthTick {
    /// Month, 0 = January.
    pub month0: u32,
    /// Position of the first day.
    pub x: f64,
    /// Axis label, `1.3.`
    pub label: String,
}

/// Geometry of one timeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScene {
    /// Displayed year.
    pub year: i32,
    /// Plot width in logical pixels.
    pub width: f64,
    /// Plot height in logical pixels.
    pub height: f64,
    /// Lanes, top to bottom.
    pub lanes: Vec<LaneBand>,
    /// Bars in draw order.
    pub bars: Vec<EventBar>,
    /// Month ticks.
    pub months: Vec<MonthTick>,
    /// Position of the today guide, only in the current year.
    pub today_x: Option<f64>,
    /// Events that could not be drawn.
    pub issues: Vec<LayoutIssue>,
}

impl TimelineScene {
    /// Lay out one pass into a `width` × `height` plot.
    pub fn build(input: &TimelineInput<'_>, config: &TimelineConfig, width: f64, height: f64) -> Self {
        let span = YearSpan::calendar(input.year);
        let mut issues = Vec::new();
        let mut members: Vec<(usize, &Event)> = Vec::new();
        for (index, event) in input.events.iter().enumerate() {
            let in_year = event.start_date.year() == input.year || event.end_date.year() == input.year;
            if !in_year || !input.selected.contains(&event.category) {
                continue;
            }
            if event.is_well_formed() {
                members.push((index, event));
            } else {
                issues.push(LayoutIssue::MalformedEvent { id: event.id.clone() });
            }
        }

        let categories: Vec<&str> = members.iter().map(|(_, event)| event.category.as_str()).collect();
        let lanes = allocate_lanes(
            &categories,
            &LaneConfig::fit(
                super::rings::ordered_categories(&categories).len(),
                height,
                config.lane_padding,
            ),
        );

        let refs: Vec<&Event> = members.iter().map(|(_, event)| *event).collect();
        let levels = compute_overlap_levels(&refs);

        let bars: Vec<EventBar> = members
            .iter()
            .enumerate()
            .filter_map(|(position, (index, event))| {
                let lane = lanes.iter().find(|lane| lane.category == event.category)?;
                let x = span.x_of(event.start_date, width);
                let end = span.x_of(event.end_date, width);
                Some(EventBar {
                    key: EventKey(*index),
                    id: event.id.clone(),
                    name: event.name.clone(),
                    category: event.category.clone(),
                    details: event.details.clone(),
                    start: event.start_date,
                    end: event.end_date,
                    x,
                    width: (end - x).max(config.min_bar_width),
                    top: lane.lane_top,
                    bottom: lane.lane_bottom,
                    level: levels.get(EventKey(position)).unwrap_or(0),
                    color: input
                        .categories
                        .color_of(&event.category)
                        .unwrap_or(Rgb::DEFAULT_FG),
                })
            })
            .collect();

        let months = (0..12)
            .filter_map(|month0| {
                let first = NaiveDate::from_ymd_opt(input.year, month0 + 1, 1)?;
                Some(MonthTick {
                    month0,
                    x: span.x_of(first, width),
                    label: first.format("%-d.%-m.").to_string(),
                })
            })
            .collect();

        let today_x = (input.now.year() == input.year).then(|| span.x_of_instant(input.now, width));

        for issue in &issues {
            issue.log("timeline");
        }
        log::debug!(
            "event=layout_pass module=timeline status=ok year={} lanes={} bars={} issues={}",
            input.year,
            lanes.len(),
            bars.len(),
            issues.len()
        );

        Self {
            year: input.year,
            width,
            height,
            lanes,
            bars,
            months,
            today_x,
            issues,
        }
    }

    /// Topmost bar under a plot point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&EventBar> {
        self.bars.iter().rev().find(|bar| bar.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::test_event;

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn build(events: &[Event], now: NaiveDateTime) -> TimelineScene {
        let categories = CategorySet::from_names(["Markkinointi", "Talous", "HR"]);
        let selected: BTreeSet<String> = categories.names().map(String::from).collect();
        let input = TimelineInput {
            events,
            categories: &categories,
            selected: &selected,
            year: 2025,
            now,
        };
        TimelineScene::build(&input, &TimelineConfig::default(), 800.0, 470.0)
    }

    #[test]
    fn test_zero_length_bar_is_min_width() {
        let scene = build(&[test_event("x", "Talous", (3, 1), (3, 1))], noon(2025, 6, 1));
        assert_eq!(scene.bars.len(), 1);
        assert!((scene.bars[0].width - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_long_bar_keeps_projected_width() {
        let scene = build(&[test_event("x", "Talous", (1, 1), (12, 31))], noon(2025, 6, 1));
        assert!(scene.bars[0].x.abs() < 1e-12);
        assert!((scene.bars[0].width - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_today_guide_only_in_current_year() {
        let events = [test_event("x", "Talous", (3, 1), (3, 5))];
        let scene = build(&events, noon(2025, 7, 2));
        let x = scene.today_x.unwrap();
        assert!(x > 400.0 && x < 402.0);

        let scene = build(&events, noon(2026, 7, 2));
        assert_eq!(scene.today_x, None);
    }

    #[test]
    fn test_lanes_from_events_in_year() {
        let mut other_year = test_event("old", "HR", (1, 1), (1, 2));
        other_year.start_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        other_year.end_date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let events = vec![
            test_event("1", "Talous", (3, 1), (3, 5)),
            test_event("2", "Markkinointi", (3, 1), (3, 5)),
            other_year,
        ];
        let scene = build(&events, noon(2025, 1, 1));
        let names: Vec<&str> = scene.lanes.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(names, vec!["Markkinointi", "Talous"]);
        assert_eq!(scene.bars.len(), 2);
        assert!(scene.bars[0].top > scene.bars[1].top);
    }

    #[test]
    fn test_spanning_events_belong_to_both_years() {
        let mut event = test_event("nye", "Talous", (1, 1), (1, 3));
        event.start_date = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let scene = build(&[event], noon(2025, 1, 1));
        assert_eq!(scene.bars.len(), 1);
        assert!(scene.bars[0].x < 0.0);
    }

    #[test]
    fn test_overlaps_share_lane_with_label_levels() {
        let events = vec![
            test_event("a", "Talous", (3, 1), (3, 20)),
            test_event("b", "Talous", (3, 10), (3, 30)),
        ];
        let scene = build(&events, noon(2025, 1, 1));
        assert_eq!(scene.bars[0].top, scene.bars[1].top);
        assert_eq!((scene.bars[0].level, scene.bars[1].level), (0, 1));
        let hit = scene.hit_test(scene.bars[1].x + 1.0, scene.bars[1].top + 1.0).unwrap();
        assert_eq!(hit.id.as_str(), "b");
    }

    #[test]
    fn test_month_ticks() {
        let scene = build(&[], noon(2025, 1, 1));
        assert_eq!(scene.months.len(), 12);
        assert_eq!(scene.months[2].label, "1.3.");
        assert!(scene.months[0].x.abs() < 1e-12);
        assert!(scene.lanes.is_empty());
    }
}
