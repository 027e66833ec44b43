//! Views: the radial clock, the timeline, the month agenda and the event list.
//!
//! Every view implements [`Widget`]. Views draw into a [`crate::buffer::Buffer`]
//! and report user intents through [`ViewCallbacks`]; none of them touch the
//! data they display.
//!
//! # Example
//!
//! ```rust,ignore
//! use yearclock::widget::{RadialClock, ViewSignal, Widget};
//!
//! let mut clock = RadialClock::new(area, geometry, theme);
//! clock.update(&input);
//! clock.render(&mut buffer);
//!
//! let mut signals: Vec<ViewSignal> = Vec::new();
//! clock.handle_input(&event, &mut signals);
//! ```

mod agenda;
mod clock;
mod event_list;
mod status_bar;
mod theme;
mod timeline;
mod tooltip;
mod traits;

pub use agenda::AgendaView;
pub use clock::{ClockViewport, RadialClock};
pub use event_list::{EventList, EventRow};
pub use status_bar::StatusBar;
pub use theme::{month_name, Theme, MONTH_NAMES};
pub use timeline::Timeline;
pub use tooltip::Tooltip;
pub use traits::{ViewCallbacks, ViewSignal, Widget};
