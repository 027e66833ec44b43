//! Actor Model: message-passing concurrency for the view shell.
//!
//! Background threads only produce messages; all layout and drawing happen
//! on the main loop:
//! - **Input Actor**: polls terminal events, forwards them to the main loop
//! - **Ticker Actors**: fire the today refresh and the reminder poll
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │  Main Loop   │
//!                                      │  (select!)   │
//! ┌──────────────┐        Tick         │              │
//! │ Today Ticker │ ─────────────────▶  │  layout +    │
//! └──────────────┘                     │  draw +      │
//! ┌──────────────┐        Tick         │  flush       │
//! │Reminder Tick │ ─────────────────▶  │              │
//! └──────────────┘                     └──────────────┘
//! ```

mod input;
mod messages;
mod ticker;

pub use input::InputActor;
pub use messages::{InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent, Tick};
pub use ticker::TickerActor;
