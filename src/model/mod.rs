//! Data model: events, categories, projects, reminders and the queries over them.
//!
//! Everything here is plain data plus validation. Layout code only reads it.

pub mod category;
pub mod event;
pub mod project;
pub mod query;
pub mod reminder;

pub use category::{color_for, Category, CategorySet, DEFAULT_CATEGORIES, DEFAULT_PALETTE, MAX_CATEGORIES};
pub use event::{Event, EventDraft, EventId, Priority};
pub use project::{Project, ProjectId};
pub use reminder::Reminder;

use serde::{Deserialize, Deserializer};

/// Identifiers were numbers in older documents; accept both.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(number) => number.to_string(),
        RawId::Float(number) => number.to_string(),
    })
}
