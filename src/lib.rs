//! # Yearclock
//!
//! A radial year clock and timeline for planning a year of events in the
//! terminal.
//!
//! Events belong to categories. The clock gives every category a ring, the
//! timeline gives it a lane, and overlapping events of one category are
//! stacked into sub-bands.
//!
//! ## Core Concepts
//!
//! - **Projection**: dates map to an angle (clock) or an x position
//!   (timeline) across one calendar year
//! - **Ring allocation**: rings are sized by category and nested by name
//! - **Overlap resolution**: a sweep assigns each event the lowest free level
//! - **Scenes**: pure descriptions of a frame, rebuilt from a snapshot on
//!   every pass and rasterized by the widgets
//!
//! ## Example
//!
//! ```rust,ignore
//! use yearclock::layout::{ClockGeometry, ClockInput, ClockScene, YearSpan};
//!
//! let scene = ClockScene::build(
//!     &ClockInput {
//!         events: &events,
//!         categories: &categories,
//!         selected: &selected,
//!         span: YearSpan::calendar(2025),
//!         now,
//!         order: StackOrder::default(),
//!     },
//!     &ClockGeometry::default(),
//! );
//! assert!(scene.issues.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod app;
pub mod buffer;
pub mod canvas;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod model;
pub mod sample;
pub mod service;
pub mod store;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use actor::{InputEvent, KeyCode, KeyModifiers};
pub use app::{App, Tab};
pub use buffer::{Buffer, Cell, Modifiers, Rgb};
pub use config::AppConfig;
pub use error::{Result, YearClockError};
pub use layout::{compute_overlap_levels, ClockGeometry, ClockScene, Rect, StackOrder, TimelineScene, YearSpan};
pub use logging::init_logging;
pub use model::{Category, CategorySet, Event, EventId, Project, ProjectId, Reminder};
pub use widget::{RadialClock, Timeline, ViewCallbacks, ViewSignal, Widget};
