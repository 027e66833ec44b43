//! Layout: from an event snapshot to geometry.
//!
//! The pipeline is projection → ring allocation → overlap resolution →
//! scene. Scenes are plain data built fresh on every pass; widgets rasterize
//! them and hit-test against them.

pub mod linear;
pub mod overlap;
pub mod projection;
pub mod radial;
mod rect;
pub mod rings;

pub use linear::{EventBar, MonthTick, TimelineConfig, TimelineInput, TimelineScene};
pub use overlap::{compute_overlap_levels, compute_overlap_levels_with, EventKey, OverlapLevels, Span, StackOrder};
pub use projection::{project_angle, project_x, to_cartesian, YearSpan};
pub use radial::{ClockGeometry, ClockInput, ClockScene, EventArc};
pub use rect::Rect;
pub use rings::{allocate_lanes, allocate_rings, LaneBand, LaneConfig, RingBand, RingConfig};

use crate::model::EventId;
use thiserror::Error;

/// A problem with one event found while laying out a frame.
///
/// None of these stop the frame from rendering: the affected event is
/// skipped (or, for [`LayoutIssue::DegenerateLayout`], drawn overlapping).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutIssue {
    /// The event ends before it starts.
    #[error("event `{id}` ends before it starts; skipped")]
    MalformedEvent {
        /// Event id.
        id: EventId,
    },

    /// The event's category has no ring or lane.
    #[error("event `{id}` has no band for category `{category}`; skipped")]
    UnknownCategory {
        /// Event id.
        id: EventId,
        /// The unmatched category.
        category: String,
    },

    /// The event lies entirely outside the displayed year.
    #[error("event `{id}` is outside the displayed year; skipped")]
    OutsideSpan {
        /// Event id.
        id: EventId,
    },

    /// A category stacks deeper than its sub-bands.
    #[error("category `{category}` stacks to level {depth}; arcs overlap")]
    DegenerateLayout {
        /// Category name.
        category: String,
        /// Deepest level reached.
        depth: usize,
    },
}

impl LayoutIssue {
    pub(crate) fn log(&self, module: &str) {
        match self {
            Self::DegenerateLayout { .. } => {
                log::warn!("event=layout_issue module={module} status=degraded detail={self}");
            }
            _ => log::debug!("event=layout_issue module={module} status=skipped detail={self}"),
        }
    }
}
