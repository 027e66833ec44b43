//! Temporal projection: dates onto angles and horizontal positions.
//!
//! The map is linear and unclamped. Dates before the span give negative
//! values and dates after it exceed the range; callers decide what to clip.
//!
//! Angles follow the clock convention: 0 is January 1 at twelve o'clock,
//! increasing clockwise. [`to_cartesian`] applies the quarter-turn so that
//! screen coordinates (y down) come out right.

use crate::error::{Result, YearClockError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::f64::consts::{FRAC_PI_2, TAU};

/// The date domain of one projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl YearSpan {
    /// Span from `start` to `end`; `end` must be after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(YearClockError::InvalidSpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1 to December 31 of `year`.
    ///
    /// Years outside chrono's range fall back to the nearest valid year.
    pub fn calendar(year: i32) -> Self {
        let year = year.clamp(NaiveDate::MIN.year() + 1, NaiveDate::MAX.year() - 1);
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// First day.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Year of the first day.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    fn length_days(&self) -> f64 {
        days_f64(self.end.signed_duration_since(self.start).num_days())
    }

    /// Position of `date` in the span: 0.0 at the start, 1.0 at the end.
    pub fn fraction(&self, date: NaiveDate) -> f64 {
        days_f64(date.signed_duration_since(self.start).num_days()) / self.length_days()
    }

    /// Position of an instant, with sub-day precision.
    pub fn fraction_at(&self, instant: NaiveDateTime) -> f64 {
        let origin = self.start.and_time(NaiveTime::MIN);
        let seconds = instant.signed_duration_since(origin).num_seconds();
        days_f64(seconds) / 86_400.0 / self.length_days()
    }

    /// Clock angle of `date`: 0 at the start, 2π at the end.
    pub fn angle_of(&self, date: NaiveDate) -> f64 {
        self.fraction(date) * TAU
    }

    /// Clock angle of an instant.
    pub fn angle_of_instant(&self, instant: NaiveDateTime) -> f64 {
        self.fraction_at(instant) * TAU
    }

    /// Horizontal position of `date` on an axis `pixel_width` wide.
    pub fn x_of(&self, date: NaiveDate, pixel_width: f64) -> f64 {
        self.fraction(date) * pixel_width
    }

    /// Horizontal position of an instant.
    pub fn x_of_instant(&self, instant: NaiveDateTime, pixel_width: f64) -> f64 {
        self.fraction_at(instant) * pixel_width
    }
}

#[allow(clippy::cast_precision_loss)]
fn days_f64(value: i64) -> f64 {
    value as f64
}

/// Clock angle of `date` within `[year_start, year_end]`.
pub fn angle_of(date: NaiveDate, year_start: NaiveDate, year_end: NaiveDate) -> Result<f64> {
    Ok(YearSpan::new(year_start, year_end)?.angle_of(date))
}

/// Horizontal position of `date` within `[year_start, year_end]`.
pub fn x_of(date: NaiveDate, year_start: NaiveDate, year_end: NaiveDate, pixel_width: f64) -> Result<f64> {
    Ok(YearSpan::new(year_start, year_end)?.x_of(date, pixel_width))
}

/// Clock angle of `date` within its own calendar year.
pub fn project_angle(date: NaiveDate) -> f64 {
    YearSpan::calendar(date.year()).angle_of(date)
}

/// Horizontal position of `date` on the axis of calendar year `year`.
pub fn project_x(date: NaiveDate, year: i32, pixel_width: f64) -> f64 {
    YearSpan::calendar(year).x_of(date, pixel_width)
}

/// Screen offset (y down) of a point at clock `angle` and `radius`.
pub fn to_cartesian(angle: f64, radius: f64) -> (f64, f64) {
    let theta = angle - FRAC_PI_2;
    (radius * theta.cos(), radius * theta.sin())
}

/// Clock angle in `[0, 2π)` of a screen offset (y down) from the centre.
pub fn angle_at(dx: f64, dy: f64) -> f64 {
    (dy.atan2(dx) + FRAC_PI_2).rem_euclid(TAU)
}
