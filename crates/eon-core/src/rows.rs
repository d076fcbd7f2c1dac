//! Lane assignment for overlapping events.
//!
//! Events in the same category that overlap in time must not share a row, or
//! the renderer would draw them on top of each other. Assignment is first-fit
//! greedy over a stable ordering, which keeps lanes minimal and deterministic.
//!
//! Parent/child nesting is deliberately not handled here: hierarchy is a
//! vertical *offset* applied by the renderer from the resolved parent's row,
//! not a separate lane. Overlap avoidance is purely temporal.

use std::collections::HashMap;

use crate::event::Event;
use crate::types::CategoryId;

/// A computed lane for one event, keyed by internal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAssignment {
    /// Internal id of the event.
    pub id: u64,
    /// Assigned lane, 0-based.
    pub row: u32,
}

/// Temporal overlap test.
///
/// Strict inequalities: adjacent or touching events do not collide.
#[must_use]
pub fn overlap(a: &Event, b: &Event) -> bool {
    a.start < b.end && b.start < a.end
}

/// Assigns a lane to every event such that no two overlapping events in the
/// same category share one.
///
/// Pure function over an immutable snapshot: all assignments are computed
/// before any are applied, so a partially-updated collection can never skew
/// the scan. Within a category, events are processed by start date with ties
/// broken by slice order (insertion order), making the result stable across
/// recomputations.
///
/// Cost is quadratic per category, which is fine at the expected scale of
/// tens of events per category.
#[must_use]
pub fn compute_rows(events: &[Event]) -> Vec<RowAssignment> {
    // Group indices by category, preserving slice order within each group.
    let mut groups: HashMap<Option<&CategoryId>, Vec<usize>> = HashMap::new();
    for (idx, event) in events.iter().enumerate() {
        groups.entry(event.category.as_ref()).or_default().push(idx);
    }

    let mut assignments = Vec::with_capacity(events.len());
    for indices in groups.values() {
        let mut order = indices.clone();
        order.sort_by_key(|&idx| (events[idx].start, idx));

        // (row, index) pairs already placed in this category.
        let mut placed: Vec<(u32, usize)> = Vec::new();
        for idx in order {
            let candidate = &events[idx];
            let mut row = 0u32;
            loop {
                let occupied = placed
                    .iter()
                    .any(|&(r, other)| r == row && overlap(candidate, &events[other]));
                if !occupied {
                    break;
                }
                row += 1;
            }
            placed.push((row, idx));
            assignments.push(RowAssignment {
                id: candidate.id,
                row,
            });
        }
    }
    assignments
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::event::EventKind;
    use crate::types::{Color, EventId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: u64, start: NaiveDate, end: NaiveDate, category: Option<&str>) -> Event {
        let mut event = Event::new(
            id,
            EventId::new(format!("E{id}")).unwrap(),
            format!("Event {id}"),
            EventKind::Range,
            start,
            end,
            Color::new("#808080").unwrap(),
        )
        .unwrap();
        event.category = category.map(|c| CategoryId::new(c).unwrap());
        event
    }

    fn row_of(assignments: &[RowAssignment], id: u64) -> u32 {
        assignments.iter().find(|a| a.id == id).unwrap().row
    }

    #[test]
    fn overlapping_pair_gets_distinct_rows() {
        // Two ranges in one category, Jan 1-10 and Jan 5-20.
        let events = vec![
            event(1, date(2023, 1, 1), date(2023, 1, 10), Some("work")),
            event(2, date(2023, 1, 5), date(2023, 1, 20), Some("work")),
        ];
        let assignments = compute_rows(&events);
        assert_eq!(row_of(&assignments, 1), 0);
        assert_eq!(row_of(&assignments, 2), 1);
    }

    #[test]
    fn touching_events_share_a_row() {
        let events = vec![
            event(1, date(2023, 1, 1), date(2023, 1, 10), Some("work")),
            event(2, date(2023, 1, 10), date(2023, 1, 20), Some("work")),
        ];
        let assignments = compute_rows(&events);
        assert_eq!(row_of(&assignments, 1), 0);
        assert_eq!(row_of(&assignments, 2), 0);
    }

    #[test]
    fn non_overlapping_events_all_on_row_zero() {
        let events = vec![
            event(1, date(2023, 1, 1), date(2023, 1, 5), Some("a")),
            event(2, date(2023, 2, 1), date(2023, 2, 5), Some("a")),
            event(3, date(2023, 3, 1), date(2023, 3, 5), Some("a")),
        ];
        for assignment in compute_rows(&events) {
            assert_eq!(assignment.row, 0);
        }
    }

    #[test]
    fn different_categories_do_not_collide() {
        let events = vec![
            event(1, date(2023, 1, 1), date(2023, 1, 10), Some("a")),
            event(2, date(2023, 1, 1), date(2023, 1, 10), Some("b")),
            event(3, date(2023, 1, 1), date(2023, 1, 10), None),
        ];
        for assignment in compute_rows(&events) {
            assert_eq!(assignment.row, 0);
        }
    }

    #[test]
    fn first_fit_reuses_freed_rows() {
        // Third event overlaps the second but not the first, so it fits back
        // on row 0.
        let events = vec![
            event(1, date(2023, 1, 1), date(2023, 1, 5), Some("work")),
            event(2, date(2023, 1, 3), date(2023, 1, 20), Some("work")),
            event(3, date(2023, 1, 10), date(2023, 1, 15), Some("work")),
        ];
        let assignments = compute_rows(&events);
        assert_eq!(row_of(&assignments, 1), 0);
        assert_eq!(row_of(&assignments, 2), 1);
        assert_eq!(row_of(&assignments, 3), 0);
    }

    #[test]
    fn ties_broken_by_insertion_order() {
        let events = vec![
            event(7, date(2023, 1, 1), date(2023, 1, 10), Some("work")),
            event(8, date(2023, 1, 1), date(2023, 1, 10), Some("work")),
        ];
        let assignments = compute_rows(&events);
        assert_eq!(row_of(&assignments, 7), 0);
        assert_eq!(row_of(&assignments, 8), 1);
    }

    #[test]
    fn rows_never_collide() {
        // Dense pile-up: every pair on the same row must be non-overlapping.
        let events: Vec<Event> = (0..20)
            .map(|i| {
                event(
                    i,
                    date(2023, 1, 1 + u32::try_from(i % 10).unwrap()),
                    date(2023, 1, 5 + u32::try_from(i % 10).unwrap()),
                    Some("dense"),
                )
            })
            .collect();
        let assignments = compute_rows(&events);
        for a in &assignments {
            for b in &assignments {
                if a.id == b.id || a.row != b.row {
                    continue;
                }
                let ea = events.iter().find(|e| e.id == a.id).unwrap();
                let eb = events.iter().find(|e| e.id == b.id).unwrap();
                assert!(!overlap(ea, eb), "events {} and {} collide", a.id, b.id);
            }
        }
    }

    #[test]
    fn rows_are_minimal() {
        // For every event on row r > 0, each lower row holds an overlapping
        // peer; otherwise first-fit would have taken it.
        let events: Vec<Event> = (0..15)
            .map(|i| {
                event(
                    i,
                    date(2023, 1, 1 + u32::try_from(i).unwrap()),
                    date(2023, 1, 8 + u32::try_from(i).unwrap()),
                    Some("dense"),
                )
            })
            .collect();
        let assignments = compute_rows(&events);
        for a in &assignments {
            let ea = events.iter().find(|e| e.id == a.id).unwrap();
            for lower in 0..a.row {
                let blocked = assignments.iter().any(|b| {
                    b.row == lower && {
                        let eb = events.iter().find(|e| e.id == b.id).unwrap();
                        overlap(ea, eb)
                    }
                });
                assert!(blocked, "event {} skipped free row {lower}", a.id);
            }
        }
    }

    #[test]
    fn point_events_on_same_day_share_a_row() {
        // start == end means the strict overlap test is false; hierarchy
        // offsets, not lanes, separate such markers visually.
        let mut a = event(1, date(2023, 1, 1), date(2023, 1, 1), Some("m"));
        a.kind = EventKind::Milestone;
        let mut b = event(2, date(2023, 1, 1), date(2023, 1, 1), Some("m"));
        b.kind = EventKind::Milestone;
        let assignments = compute_rows(&[a, b]);
        assert_eq!(row_of(&assignments, 1), 0);
        assert_eq!(row_of(&assignments, 2), 0);
    }
}
