//! Colours shared by every view.

use crate::buffer::{Rgb, TextStyle};
use serde::{Deserialize, Serialize};

/// Palette for the views; colours are `#rrggbb` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Canvas background.
    pub background: Rgb,
    /// Centre disc and panels.
    pub surface: Rgb,
    /// Body text.
    pub text: Rgb,
    /// Secondary text: week numbers, dates, hints.
    pub muted: Rgb,
    /// Month spokes, grid lines, outlines.
    pub guide: Rgb,
    /// Today ray, dot and guide.
    pub today: Rgb,
    /// Agenda affordance and active tab.
    pub accent: Rgb,
    /// Tooltip panel.
    pub tooltip_bg: Rgb,
    /// Tooltip text.
    pub tooltip_fg: Rgb,
    /// Status bar background.
    pub status_bg: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgb::DEFAULT_BG,
            surface: Rgb::new(32, 33, 42),
            text: Rgb::DEFAULT_FG,
            muted: Rgb::new(130, 132, 145),
            guide: Rgb::new(70, 72, 86),
            today: Rgb::new(231, 76, 60),
            accent: Rgb::new(33, 150, 243),
            tooltip_bg: Rgb::new(245, 245, 245),
            tooltip_fg: Rgb::new(34, 34, 34),
            status_bg: Rgb::new(40, 40, 48),
        }
    }
}

impl Theme {
    /// Body text over the surface underneath.
    pub const fn text_style(&self) -> TextStyle {
        TextStyle::overlay(self.text)
    }

    /// Secondary text over the surface underneath.
    pub const fn muted_style(&self) -> TextStyle {
        TextStyle::overlay(self.muted)
    }

    /// Tooltip text on the tooltip panel.
    pub const fn tooltip_style(&self) -> TextStyle {
        TextStyle::new(self.tooltip_fg, self.tooltip_bg)
    }
}

/// Finnish month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Tammikuu",
    "Helmikuu",
    "Maaliskuu",
    "Huhtikuu",
    "Toukokuu",
    "Kesäkuu",
    "Heinäkuu",
    "Elokuu",
    "Syyskuu",
    "Lokakuu",
    "Marraskuu",
    "Joulukuu",
];

/// Name of month `month0` (0 = January); empty when out of range.
pub fn month_name(month0: u32) -> &'static str {
    usize::try_from(month0)
        .ok()
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
        .unwrap_or("")
}
