//! Ring allocation: one radius band (or lane) per category.
//!
//! Categories are laid out in lexicographic order, outermost first. The
//! allocator never fails; with too many categories the innermost bands reach
//! zero or negative radii and draw nothing. Projects cap categories at
//! [`crate::model::MAX_CATEGORIES`], which keeps every band positive with the
//! default geometry.

use serde::{Deserialize, Serialize};

/// Number of equal sub-bands per ring.
pub const SUB_BANDS: usize = 3;

/// Ring geometry in clock units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Radius the rings are measured from.
    pub base_radius: f64,
    /// Radial thickness of each ring.
    pub ring_width: f64,
    /// Gap between neighbouring rings.
    pub ring_spacing: f64,
    /// Gap between the base radius and the outermost ring.
    pub inner_offset: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            base_radius: 360.0,
            ring_width: 45.0,
            ring_spacing: 15.0,
            inner_offset: 20.0,
        }
    }
}

/// The radius interval of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBand {
    /// Category name.
    pub category: String,
    /// Inner radius.
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
}

impl RingBand {
    /// Radial thickness.
    pub fn width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Radii of the sub-band used by stack `level` (segment 0 innermost).
    pub fn sub_band(&self, level: usize) -> (f64, f64) {
        let step = self.width() / as_f64(SUB_BANDS);
        let k = as_f64(level % SUB_BANDS);
        (self.inner_radius + k * step, self.inner_radius + (k + 1.0) * step)
    }

    /// Whether radius `r` falls inside the band.
    pub fn contains(&self, r: f64) -> bool {
        r >= self.inner_radius && r <= self.outer_radius
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn as_f64(value: usize) -> f64 {
    value as f64
}

/// Sorted, de-duplicated category names.
pub fn ordered_categories<S: AsRef<str>>(categories: &[S]) -> Vec<&str> {
    let mut names: Vec<&str> = categories.iter().map(AsRef::as_ref).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Allocate one ring per category, outermost first.
///
/// Band `i` has `outer = base_radius - inner_offset - i * (ring_width + ring_spacing)`
/// and `inner = outer - ring_width`.
pub fn allocate_rings<S: AsRef<str>>(categories: &[S], config: &RingConfig) -> Vec<RingBand> {
    let start = config.base_radius - config.inner_offset;
    let step = config.ring_width + config.ring_spacing;
    ordered_categories(categories)
        .into_iter()
        .enumerate()
        .map(|(i, category)| {
            let outer = start - as_f64(i) * step;
            RingBand {
                category: category.to_string(),
                inner_radius: outer - config.ring_width,
                outer_radius: outer,
            }
        })
        .collect()
}

/// Lane geometry in logical pixels, measured down from the top of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneConfig {
    /// Offset of the first lane.
    pub top: f64,
    /// Height of each lane.
    pub lane_height: f64,
    /// Gap between lanes.
    pub lane_spacing: f64,
}

impl LaneConfig {
    /// Fit `count` lanes into `height` with a padding ratio in `[0, 1)`.
    ///
    /// The step is `height / (count + padding)`; each lane takes
    /// `step * (1 - padding)` and the padding before the first lane, between
    /// lanes and after the last lane is `step * padding`.
    pub fn fit(count: usize, height: f64, padding: f64) -> Self {
        let padding = padding.clamp(0.0, 0.95);
        let step = height / (as_f64(count.max(1)) + padding);
        Self {
            top: step * padding,
            lane_height: step * (1.0 - padding),
            lane_spacing: step * padding,
        }
    }
}

/// The vertical interval of one category in the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneBand {
    /// Category name.
    pub category: String,
    /// Top edge.
    pub lane_top: f64,
    /// Bottom edge.
    pub lane_bottom: f64,
}

impl LaneBand {
    /// Lane height.
    pub fn height(&self) -> f64 {
        self.lane_bottom - self.lane_top
    }
}

/// Allocate one lane per category, top to bottom in sorted order.
pub fn allocate_lanes<S: AsRef<str>>(categories: &[S], config: &LaneConfig) -> Vec<LaneBand> {
    let step = config.lane_height + config.lane_spacing;
    ordered_categories(categories)
        .into_iter()
        .enumerate()
        .map(|(i, category)| {
            let top = config.top + as_f64(i) * step;
            LaneBand {
                category: category.to_string(),
                lane_top: top,
                lane_bottom: top + config.lane_height,
            }
        })
        .collect()
}
