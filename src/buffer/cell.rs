//! Cell: one terminal position, plus the colour type shared by every layer.
//!
//! A cell stores its grapheme inline (up to 4 UTF-8 bytes). Anything longer
//! is replaced by U+FFFD when written, which never happens for the text this
//! crate draws (labels, box drawing, half blocks).

use bitflags::bitflags;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Default foreground.
    pub const DEFAULT_FG: Self = Self::new(220, 220, 220);
    /// Default background.
    pub const DEFAULT_BG: Self = Self::new(18, 18, 24);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Composite `self` over `under` with the given opacity (0.0..=1.0).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn over(self, under: Self, alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| -> u8 {
            f64::from(bottom)
                .mul_add(1.0 - alpha, f64::from(top) * alpha)
                .round() as u8
        };
        Self::new(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
    }

    /// Darken by `k` steps of 0.7, the usual perceptual "darker" factor.
    #[must_use]
    pub fn darker(self, k: f64) -> Self {
        self.scaled(0.7_f64.powf(k))
    }

    /// Brighten by `k` steps of 1/0.7.
    #[must_use]
    pub fn brighter(self, k: f64) -> Self {
        self.scaled((1.0 / 0.7_f64).powf(k))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn scaled(self, factor: f64) -> Self {
        let channel = |c: u8| (f64::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Relative luminance in 0.0..=1.0 (Rec. 709 weights, no gamma).
    pub fn luminance(self) -> f64 {
        0.0722f64.mul_add(
            f64::from(self.b),
            0.2126f64.mul_add(f64::from(self.r), 0.7152 * f64::from(self.g)),
        ) / 255.0
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrast_text(self) -> Self {
        if self.luminance() > 0.55 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid colour `{text}`")))
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// # Example
    /// ```
    /// use yearclock::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::UNDERLINE;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

bitflags! {
    /// Cell-level flags.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// This cell is the right half of a wide character.
        const WIDE_CONTINUATION = 0b0000_0001;
    }
}

impl std::fmt::Debug for CellFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single terminal cell: grapheme, colours and style.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    grapheme: [u8; 4],
    grapheme_len: u8,
    display_width: u8,
    fg: Rgb,
    bg: Rgb,
    modifiers: Modifiers,
    flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space character with default colors).
    pub const EMPTY: Self = Self {
        grapheme: [b' ', 0, 0, 0],
        grapheme_len: 1,
        display_width: 1,
        fg: Rgb::DEFAULT_FG,
        bg: Rgb::DEFAULT_BG,
        modifiers: Modifiers::empty(),
        flags: CellFlags::empty(),
    };

    /// Create a cell holding one character.
    #[inline]
    pub fn new(c: char) -> Self {
        let mut grapheme = [0u8; 4];
        let len = c.encode_utf8(&mut grapheme).len();
        let width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        Self {
            grapheme,
            grapheme_len: u8::try_from(len).unwrap_or(1),
            display_width: u8::try_from(width).unwrap_or(1),
            ..Self::EMPTY
        }
    }

    /// Create a cell from a grapheme cluster.
    ///
    /// Clusters longer than 4 bytes are stored as U+FFFD.
    pub fn from_grapheme(s: &str) -> Self {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 {
            return Self::new('\u{FFFD}');
        }
        let mut grapheme = [0u8; 4];
        grapheme[..bytes.len()].copy_from_slice(bytes);
        let width = unicode_width::UnicodeWidthStr::width(s);
        Self {
            grapheme,
            grapheme_len: u8::try_from(bytes.len()).unwrap_or(1),
            display_width: u8::try_from(width).unwrap_or(1),
            ..Self::EMPTY
        }
    }

    /// Create a wide-character continuation cell.
    #[inline]
    pub const fn wide_continuation() -> Self {
        Self {
            grapheme: [0, 0, 0, 0],
            grapheme_len: 0,
            display_width: 0,
            flags: CellFlags::WIDE_CONTINUATION,
            ..Self::EMPTY
        }
    }

    /// The grapheme as a string slice.
    #[inline]
    pub fn grapheme(&self) -> &str {
        std::str::from_utf8(&self.grapheme[..usize::from(self.grapheme_len)]).unwrap_or(" ")
    }

    /// Check if this is a wide-character continuation.
    #[inline]
    pub const fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }

    /// Display width (0, 1, or 2).
    #[inline]
    pub const fn display_width(&self) -> u8 {
        self.display_width
    }

    /// Foreground color.
    #[inline]
    pub const fn fg(&self) -> Rgb {
        self.fg
    }

    /// Background color.
    #[inline]
    pub const fn bg(&self) -> Rgb {
        self.bg
    }

    /// Modifiers.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Set the foreground color.
    #[inline]
    pub const fn set_fg(&mut self, fg: Rgb) -> &mut Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    #[inline]
    pub const fn set_bg(&mut self, bg: Rgb) -> &mut Self {
        self.bg = bg;
        self
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = bg;
        self
    }

    /// Set the modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// The colour a reader perceives in this cell's upper half.
    ///
    /// For a half-block pixel pair that is the foreground, otherwise the
    /// background.
    pub fn surface(&self) -> Rgb {
        if self.grapheme() == crate::canvas::UPPER_HALF {
            self.fg
        } else {
            self.bg
        }
    }

    /// Reset the cell to empty.
    #[inline]
    pub const fn reset(&mut self) {
        *self = Self::EMPTY;
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("grapheme", &self.grapheme())
            .field("width", &self.display_width)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_serde_as_hex() {
        let json = serde_json::to_string(&Rgb::new(31, 119, 180)).unwrap();
        assert_eq!(json, "\"#1f77b4\"");
        let back: Rgb = serde_json::from_str("\"#FF7F0E\"").unwrap();
        assert_eq!(back, Rgb::from_u32(0xff7f0e));
        assert!(serde_json::from_str::<Rgb>("\"blue\"").is_err());
    }

    #[test]
    fn test_rgb_from_hex_string() {
        assert_eq!(Rgb::from_hex("#1f77b4"), Some(Rgb::new(0x1f, 0x77, 0xb4)));
        assert_eq!(Rgb::from_hex("ff7f0e"), Some(Rgb::new(0xff, 0x7f, 0x0e)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::new(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_rgb_over_blends_linearly() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(red.over(Rgb::BLACK, 1.0), red);
        assert_eq!(red.over(Rgb::BLACK, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::WHITE.over(Rgb::BLACK, 0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_rgb_darker_and_brighter() {
        let c = Rgb::new(100, 200, 50);
        let dark = c.darker(1.0);
        assert_eq!(dark, Rgb::new(70, 140, 35));
        assert_eq!(Rgb::new(200, 200, 200).brighter(1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(Rgb::WHITE.contrast_text(), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.contrast_text(), Rgb::WHITE);
    }

    #[test]
    fn test_cell_new_unicode() {
        let cell = Cell::new('日');
        assert_eq!(cell.grapheme(), "日");
        assert_eq!(cell.display_width(), 2);

        let block = Cell::new('▀');
        assert_eq!(block.grapheme(), "▀");
        assert_eq!(block.display_width(), 1);
    }

    #[test]
    fn test_cell_from_long_grapheme_is_replaced() {
        let cell = Cell::from_grapheme("👨‍👩‍👧");
        assert_eq!(cell.grapheme(), "\u{FFFD}");
    }

    #[test]
    fn test_cell_builder_pattern() {
        let cell = Cell::new('X')
            .with_fg(Rgb::new(255, 0, 0))
            .with_bg(Rgb::new(0, 0, 255))
            .with_modifiers(Modifiers::BOLD);

        assert_eq!(cell.fg(), Rgb::new(255, 0, 0));
        assert_eq!(cell.bg(), Rgb::new(0, 0, 255));
        assert!(cell.modifiers().contains(Modifiers::BOLD));
    }

    #[test]
    fn test_cell_surface() {
        let top = Rgb::new(10, 20, 30);
        let half = Cell::new('▀').with_fg(top).with_bg(Rgb::WHITE);
        assert_eq!(half.surface(), top);
        let text = Cell::new('a').with_bg(Rgb::WHITE);
        assert_eq!(text.surface(), Rgb::WHITE);
    }

    #[test]
    fn test_cell_reset() {
        let mut cell = Cell::new('X').with_fg(Rgb::new(255, 0, 0));
        cell.reset();
        assert_eq!(cell, Cell::EMPTY);
    }
}
