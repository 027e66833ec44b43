//! Buffer module: the cell grid every widget draws into.
//!
//! This module contains:
//! - [`Cell`]: one terminal position
//! - [`Buffer`]: a frame of cells
//! - [`Rgb`]: true colour with blending helpers
//! - [`Modifiers`]: text style bitflags
//! - [`diff`]: minimal ANSI output between frames

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use buffer::{Buffer, TextStyle};
pub use cell::{Cell, CellFlags, Modifiers, Rgb};
