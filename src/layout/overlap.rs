//! Overlap resolution: a stack level per event within its category.
//!
//! The level of an event is the lowest level not taken by an earlier event
//! in the same category whose inclusive date range overlaps it. "Earlier"
//! means earlier in the input slice by default; [`StackOrder::StartDate`]
//! orders each category by start date first. The result is recomputed on
//! every call and is `O(n²)` per category.
//!
//! Two overlapping events never share a level. Levels at or above
//! [`SUB_BANDS`] wrap onto the same sub-bands and may then draw on top of
//! each other; [`OverlapLevels::degenerate_categories`] reports where that
//! happens.

use super::rings::SUB_BANDS;
use crate::model::Event;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A categorized, inclusive date interval.
pub trait Span {
    /// Category name.
    fn category(&self) -> &str;
    /// First day.
    fn start(&self) -> NaiveDate;
    /// Last day.
    fn end(&self) -> NaiveDate;

    /// Inclusive overlap test, ignoring category.
    fn overlaps<O: Span + ?Sized>(&self, other: &O) -> bool {
        self.start() <= other.end() && other.start() <= self.end()
    }
}

impl Span for Event {
    fn category(&self) -> &str {
        &self.category
    }

    fn start(&self) -> NaiveDate {
        self.start_date
    }

    fn end(&self) -> NaiveDate {
        self.end_date
    }
}

impl<T: Span + ?Sized> Span for &T {
    fn category(&self) -> &str {
        (**self).category()
    }

    fn start(&self) -> NaiveDate {
        (**self).start()
    }

    fn end(&self) -> NaiveDate {
        (**self).end()
    }
}

/// Position of an event in the slice passed to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey(pub usize);

/// Which events count as "earlier" when stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOrder {
    /// Order of the input slice.
    #[default]
    Insertion,
    /// Start date, ties broken by input order.
    StartDate,
}

/// Stack level for every event of one resolver pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlapLevels {
    levels: Vec<usize>,
    categories: Vec<String>,
}

impl OverlapLevels {
    /// Level of the event at `key`, `None` if the key is out of range.
    pub fn get(&self, key: EventKey) -> Option<usize> {
        self.levels.get(key.0).copied()
    }

    /// Sub-band (`level % 3`) of the event at `key`.
    pub fn sub_band_of(&self, key: EventKey) -> Option<usize> {
        self.get(key).map(sub_band_index)
    }

    /// Number of events resolved.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no events were resolved.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Highest level assigned, 0 when empty.
    pub fn max_level(&self) -> usize {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// `(key, level)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (EventKey, usize)> + '_ {
        self.levels.iter().enumerate().map(|(i, level)| (EventKey(i), *level))
    }

    /// Categories whose stacks exceed the sub-band count, with their deepest level.
    pub fn degenerate_categories(&self) -> Vec<(&str, usize)> {
        let mut deepest: Vec<(&str, usize)> = Vec::new();
        for (category, level) in self.categories.iter().zip(&self.levels) {
            if *level < SUB_BANDS {
                continue;
            }
            match deepest.iter_mut().find(|entry| entry.0 == category.as_str()) {
                Some(entry) => entry.1 = entry.1.max(*level),
                None => deepest.push((category.as_str(), *level)),
            }
        }
        deepest
    }
}

/// Sub-band used by a stack level.
pub const fn sub_band_index(level: usize) -> usize {
    level % SUB_BANDS
}

/// Resolve levels in input order.
pub fn compute_overlap_levels<T: Span>(events: &[T]) -> OverlapLevels {
    compute_overlap_levels_with(events, StackOrder::Insertion)
}

/// Resolve levels with an explicit stacking order.
pub fn compute_overlap_levels_with<T: Span>(events: &[T], order: StackOrder) -> OverlapLevels {
    let mut by_category: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, event) in events.iter().enumerate() {
        by_category.entry(event.category()).or_default().push(index);
    }

    let mut levels = vec![0; events.len()];
    for members in by_category.values_mut() {
        if order == StackOrder::StartDate {
            // Stable sort keeps input order among equal starts.
            members.sort_by_key(|&index| events[index].start());
        }
        for (position, &index) in members.iter().enumerate() {
            let current = &events[index];
            let taken: Vec<usize> = members[..position]
                .iter()
                .filter(|&&earlier| events[earlier].overlaps(current))
                .map(|&earlier| levels[earlier])
                .collect();
            // One of 0..=taken.len() is always free.
            levels[index] = (0..taken.len())
                .find(|level| !taken.contains(level))
                .unwrap_or(taken.len());
        }
    }

    OverlapLevels {
        levels,
        categories: events.iter().map(|e| e.category().to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::test_event;

    #[test]
    fn test_two_overlapping_in_same_category() {
        let events = vec![
            test_event("A", "Markkinointi", (1, 1), (1, 10)),
            test_event("B", "Markkinointi", (1, 5), (1, 15)),
        ];
        let levels = compute_overlap_levels(&events);
        assert_eq!(levels.get(EventKey(0)), Some(0));
        assert_eq!(levels.get(EventKey(1)), Some(1));
    }

    #[test]
    fn test_categories_are_independent() {
        let events = vec![
            test_event("A", "Markkinointi", (1, 1), (1, 10)),
            test_event("B", "Talous", (1, 1), (1, 10)),
        ];
        let levels = compute_overlap_levels(&events);
        assert_eq!(levels.get(EventKey(1)), Some(0));
    }

    #[test]
    fn test_touching_ranges_overlap() {
        let events = vec![
            test_event("A", "X", (3, 1), (3, 10)),
            test_event("B", "X", (3, 10), (3, 12)),
            test_event("C", "X", (3, 13), (3, 14)),
        ];
        let levels = compute_overlap_levels(&events);
        assert_eq!(levels.iter().map(|(_, l)| l).collect::<Vec<_>>(), vec![0, 1, 0]);
    }

    #[test]
    fn test_four_way_overlap_wraps() {
        let events: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| test_event(id, "X", (6, 1), (6, 30)))
            .collect();
        let levels = compute_overlap_levels(&events);
        let raw: Vec<usize> = levels.iter().map(|(_, l)| l).collect();
        assert_eq!(raw, vec![0, 1, 2, 3]);
        assert_eq!(levels.sub_band_of(EventKey(3)), Some(0));
        assert_eq!(levels.max_level(), 3);
        assert_eq!(levels.degenerate_categories(), vec![("X", 3)]);
    }

    fn assert_overlapping_pairs_differ(events: &[Event], order: StackOrder) {
        let levels = compute_overlap_levels_with(events, order);
        for (i, a) in events.iter().enumerate() {
            for (j, b) in events.iter().enumerate().skip(i + 1) {
                if a.category == b.category && a.overlaps(b) {
                    let (la, lb) = (levels.get(EventKey(i)), levels.get(EventKey(j)));
                    assert_ne!(la, lb, "{order:?}: events {i} and {j} share level {la:?}");
                }
            }
        }
    }

    #[test]
    fn test_overlapping_pairs_never_share_a_level() {
        let events = vec![
            test_event("1", "X", (1, 1), (1, 31)),
            test_event("2", "X", (1, 20), (2, 10)),
            test_event("3", "X", (2, 1), (2, 5)),
            test_event("4", "X", (1, 25), (1, 26)),
            test_event("5", "Y", (1, 1), (12, 31)),
            test_event("6", "X", (2, 6), (3, 1)),
        ];
        assert_overlapping_pairs_differ(&events, StackOrder::Insertion);
        assert_overlapping_pairs_differ(&events, StackOrder::StartDate);
    }

    #[test]
    fn test_chain_reuses_freed_level() {
        // 2 overlaps 1 and 3, but 1 and 3 are disjoint.
        let events = vec![
            test_event("1", "X", (1, 1), (1, 31)),
            test_event("2", "X", (1, 20), (2, 10)),
            test_event("3", "X", (2, 1), (2, 5)),
        ];
        for order in [StackOrder::Insertion, StackOrder::StartDate] {
            let levels = compute_overlap_levels_with(&events, order);
            let raw: Vec<usize> = levels.iter().map(|(_, l)| l).collect();
            assert_eq!(raw, vec![0, 1, 0], "{order:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        let events = vec![
            test_event("1", "X", (1, 1), (1, 31)),
            test_event("2", "X", (1, 20), (2, 10)),
            test_event("3", "X", (2, 1), (2, 5)),
        ];
        assert_eq!(compute_overlap_levels(&events), compute_overlap_levels(&events));
    }

    #[test]
    fn test_long_event_takes_lowest_free_level() {
        let events = vec![
            test_event("1", "X", (1, 1), (1, 5)),
            test_event("2", "X", (1, 10), (1, 15)),
            test_event("3", "X", (1, 1), (1, 31)),
        ];
        let levels = compute_overlap_levels(&events);
        assert_eq!(levels.get(EventKey(2)), Some(1));
        assert_eq!(levels.max_level(), 1);
    }

    #[test]
    fn test_start_order_changes_stacking() {
        let events = vec![
            test_event("1", "X", (1, 10), (1, 20)),
            test_event("2", "X", (1, 1), (1, 12)),
            test_event("3", "X", (1, 15), (1, 31)),
        ];
        let inserted = compute_overlap_levels(&events);
        assert_eq!(inserted.iter().map(|(_, l)| l).collect::<Vec<_>>(), vec![0, 1, 1]);

        // Sorted by start: 2, 1, 3.
        let sorted = compute_overlap_levels_with(&events, StackOrder::StartDate);
        assert_eq!(sorted.iter().map(|(_, l)| l).collect::<Vec<_>>(), vec![1, 0, 0]);
    }

    #[test]
    fn test_span_overlap_is_inclusive() {
        let a = test_event("a", "X", (1, 1), (1, 10));
        let b = test_event("b", "X", (1, 10), (1, 20));
        let c = test_event("c", "Y", (1, 11), (1, 20));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_references_resolve_like_values() {
        let events = vec![
            test_event("1", "X", (1, 1), (1, 31)),
            test_event("2", "X", (1, 20), (2, 10)),
        ];
        let refs: Vec<&Event> = events.iter().collect();
        assert_eq!(compute_overlap_levels(&refs), compute_overlap_levels(&events));
    }

    #[test]
    fn test_empty_input() {
        let levels = compute_overlap_levels::<Event>(&[]);
        assert!(levels.is_empty());
        assert_eq!(levels.max_level(), 0);
        assert_eq!(levels.get(EventKey(0)), None);
    }
}
