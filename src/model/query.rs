//! Read-only queries over an event snapshot.

use super::event::Event;
use chrono::Datelike;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Results returned by [`search`] and [`recent`] by default.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Events whose category is selected, in snapshot order.
pub fn visible<'a>(events: &'a [Event], selected: &BTreeSet<String>) -> Vec<&'a Event> {
    events.iter().filter(|e| selected.contains(&e.category)).collect()
}

/// Case-insensitive substring match on name or category.
///
/// A blank term matches nothing.
pub fn search<'a>(events: &'a [Event], term: &str, limit: usize) -> Vec<&'a Event> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    events
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle) || e.category.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

/// Case-insensitive substring match on name, details or category, by start date.
///
/// A blank term keeps every event.
pub fn filter<'a>(events: &'a [Event], term: &str) -> Vec<&'a Event> {
    let needle = term.trim().to_lowercase();
    let mut found = by_start(events);
    if !needle.is_empty() {
        found.retain(|e| {
            [&e.name, &e.details, &e.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
    }
    found
}

/// Most recently added events first.
///
/// Events with an added timestamp rank before those without; the rest fall
/// back to the latest start date.
pub fn recent(events: &[Event], limit: usize) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| match (a.added_date, b.added_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.start_date.cmp(&a.start_date),
    });
    sorted.truncate(limit);
    sorted
}

/// Events that start or end in `month0` (0 = January) of `year`, by start date.
pub fn month_agenda(events: &[Event], year: i32, month0: u32) -> Vec<&Event> {
    let in_month = |date: chrono::NaiveDate| date.year() == year && date.month0() == month0;
    let mut found: Vec<&Event> = events
        .iter()
        .filter(|e| in_month(e.start_date) || in_month(e.end_date))
        .collect();
    found.sort_by_key(|e| e.start_date);
    found
}

/// Events that start or end in `year`.
pub fn in_year(events: &[Event], year: i32) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.start_date.year() == year || e.end_date.year() == year)
        .collect()
}

/// Years touched by any event, plus `current_year`, ascending.
pub fn available_years(events: &[Event], current_year: i32) -> Vec<i32> {
    let mut years: BTreeSet<i32> = events
        .iter()
        .flat_map(|e| [e.start_date.year(), e.end_date.year()])
        .collect();
    years.insert(current_year);
    years.into_iter().collect()
}

/// Events ordered by start date, then name.
pub fn by_start(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.name.cmp(&b.name)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::test_event;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Event> {
        let mut events = vec![
            test_event("1", "Markkinointi", (1, 1), (1, 10)),
            test_event("2", "Markkinointi", (7, 1), (7, 15)),
            test_event("3", "Talous", (3, 15), (3, 30)),
            test_event("4", "Talous", (2, 25), (3, 2)),
        ];
        events[0].name = "Tammikuun ale".into();
        events[1].name = "Kesäkampanja".into();
        events[2].name = "Budjetointi".into();
        events
    }

    #[test]
    fn test_visible_filters_by_category() {
        let events = sample();
        let selected: BTreeSet<String> = ["Talous".to_string()].into();
        let ids: Vec<&str> = visible(&events, &selected).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_limited() {
        let events = sample();
        assert_eq!(search(&events, "KESÄ", 5).len(), 1);
        assert_eq!(search(&events, "talous", 5).len(), 2);
        assert_eq!(search(&events, "a", 2).len(), 2);
        assert!(search(&events, "   ", 5).is_empty());
    }

    #[test]
    fn test_filter_matches_details_and_is_unbounded() {
        let mut events = sample();
        events[0].details = "Alennusmyynti alkaa.".into();
        let ids: Vec<&str> = filter(&events, "ALENNUS").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        // Every sample event has an "a" somewhere; results follow start date.
        let ids: Vec<&str> = filter(&events, "a").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4", "3", "2"]);
        assert_eq!(filter(&events, "  ").len(), events.len());
        assert!(filter(&events, "zzz").is_empty());
    }

    #[test]
    fn test_recent_prefers_added_date() {
        let mut events = sample();
        events[2].added_date = Some(Utc.with_ymd_and_hms(2025, 1, 3, 8, 0, 0).unwrap());
        events[0].added_date = Some(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
        let ids: Vec<&str> = recent(&events, 5).iter().map(|e| e.id.as_str()).collect();
        // Dated first (newest first), then by latest start.
        assert_eq!(ids, vec!["3", "1", "2", "4"]);
        assert_eq!(recent(&events, 1).len(), 1);
    }

    #[test]
    fn test_month_agenda_uses_start_or_end_month() {
        let events = sample();
        let march: Vec<&str> = month_agenda(&events, 2025, 2).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(march, vec!["4", "3"]);
        assert!(month_agenda(&events, 2024, 2).is_empty());
    }

    #[test]
    fn test_available_years_include_current() {
        let events = sample();
        assert_eq!(available_years(&events, 2026), vec![2025, 2026]);
        assert_eq!(available_years(&[], 2026), vec![2026]);
    }

    #[test]
    fn test_by_start() {
        let events = sample();
        let ids: Vec<&str> = by_start(&events).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4", "3", "2"]);
    }
}
