//! Categories and their colours.
//!
//! Each category stores the index it was inserted with. Its colour is a pure
//! function of that index, so removing one category never recolours the
//! others and reloading a project reproduces the same colours.

use crate::buffer::Rgb;
use crate::error::{Result, YearClockError};
use serde::{Deserialize, Serialize};

/// Maximum number of categories per project.
pub const MAX_CATEGORIES: usize = 5;

/// Categories of a freshly created project.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Markkinointi", "Talous", "Henkilöstöhallinto", "Yhteiset tapahtumat"];

/// Colour-blind friendly palette, assigned in insertion order.
pub const DEFAULT_PALETTE: [Rgb; 15] = [
    Rgb::from_u32(0x1f77b4),
    Rgb::from_u32(0xff7f0e),
    Rgb::from_u32(0x2ca02c),
    Rgb::from_u32(0xd62728),
    Rgb::from_u32(0x9467bd),
    Rgb::from_u32(0x8c564b),
    Rgb::from_u32(0xe377c2),
    Rgb::from_u32(0x7f7f7f),
    Rgb::from_u32(0xbcbd22),
    Rgb::from_u32(0x17becf),
    Rgb::from_u32(0xaec7e8),
    Rgb::from_u32(0xffbb78),
    Rgb::from_u32(0x98df8a),
    Rgb::from_u32(0xff9896),
    Rgb::from_u32(0xc5b0d5),
];

/// Colour for the category inserted at `insertion_index`.
pub fn color_for(insertion_index: usize, palette: &[Rgb]) -> Rgb {
    if palette.is_empty() {
        return Rgb::DEFAULT_FG;
    }
    palette[insertion_index % palette.len()]
}

/// A named category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique name within the project.
    pub name: String,
    /// Position at which the category was added, never reused.
    pub insertion_index: usize,
}

/// The categories of one project, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
    palette: Vec<Rgb>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new()
    }
}

impl CategorySet {
    /// An empty set using [`DEFAULT_PALETTE`].
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }

    /// Build from names; each name's index is its position.
    ///
    /// Blank and repeated names are dropped. The limit is not applied here,
    /// so legacy data with more categories still loads.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !set.contains(name) {
                let insertion_index = set.categories.len();
                set.categories.push(Category {
                    name: name.to_string(),
                    insertion_index,
                });
            }
        }
        set
    }

    /// Build from stored categories, keeping their indices.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut set = Self::new();
        for category in categories {
            if !category.name.trim().is_empty() && !set.contains(&category.name) {
                set.categories.push(category);
            }
        }
        set
    }

    /// Replace the palette (builder pattern).
    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.palette = palette;
        self
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in insertion order.
    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Names in lexicographic order, the order of rings and lanes.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        names
    }

    /// Whether a category with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Assigned colour of a category.
    pub fn color_of(&self, name: &str) -> Option<Rgb> {
        self.get(name).map(|c| color_for(c.insertion_index, &self.palette))
    }

    /// Add a category. The name is trimmed.
    pub fn add(&mut self, name: &str) -> Result<&Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(YearClockError::invalid("category", "must not be empty"));
        }
        if self.contains(name) {
            return Err(YearClockError::DuplicateCategory(name.to_string()));
        }
        if self.categories.len() >= MAX_CATEGORIES {
            return Err(YearClockError::CategoryLimit { max: MAX_CATEGORIES });
        }
        let insertion_index = self.next_index();
        self.categories.push(Category {
            name: name.to_string(),
            insertion_index,
        });
        Ok(&self.categories[self.categories.len() - 1])
    }

    /// Remove a category by name.
    pub fn remove(&mut self, name: &str) -> Result<Category> {
        let position = self
            .categories
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| YearClockError::UnknownCategory(name.to_string()))?;
        Ok(self.categories.remove(position))
    }

    /// Rename a category, keeping its colour.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let new = new.trim();
        if new.is_empty() {
            return Err(YearClockError::invalid("category", "must not be empty"));
        }
        if new != old && self.contains(new) {
            return Err(YearClockError::DuplicateCategory(new.to_string()));
        }
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.name == old)
            .ok_or_else(|| YearClockError::UnknownCategory(old.to_string()))?;
        category.name = new.to_string();
        Ok(())
    }

    fn next_index(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.insertion_index + 1)
            .max()
            .unwrap_or(0)
    }
}
