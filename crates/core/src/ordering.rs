//! Queue ordering engine.
//!
//! Computes the serving order for one officer's waiting tickets. The order
//! is: prioritized tickets first, then normal tickets, each partition sorted
//! ascending by `created_at` with `id` as the stable tie-break. The first
//! element of the ordered list is the ticket currently being served; there
//! is no separate "serving" status.
//!
//! The repository layer produces the same order in SQL
//! (`ORDER BY is_prioritized DESC, created_at ASC, id ASC`); this function
//! is the canonical definition and what in-memory callers use.

use std::cmp::Ordering;

use crate::types::{DbId, Timestamp};

/// Minimal view of a ticket the ordering engine needs.
pub trait QueueEntry {
    fn id(&self) -> DbId;
    fn is_prioritized(&self) -> bool;
    fn created_at(&self) -> Timestamp;
}

/// Compare two entries by serving order.
pub fn compare<T: QueueEntry>(a: &T, b: &T) -> Ordering {
    // `true > false`, so prioritized entries sort first.
    b.is_prioritized()
        .cmp(&a.is_prioritized())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Sort waiting tickets into serving order.
///
/// Pure, stable, and idempotent: the same input always yields the same
/// output, and re-ordering an already ordered list changes nothing.
pub fn order<T: QueueEntry>(mut entries: Vec<T>) -> Vec<T> {
    entries.sort_by(compare);
    entries
}

/// The ticket currently being served, i.e. the head of the ordered list.
pub fn serving<T: QueueEntry>(ordered: &[T]) -> Option<&T> {
    ordered.first()
}

/// The next ticket up after the one currently being served.
pub fn next_up<T: QueueEntry>(ordered: &[T]) -> Option<&T> {
    ordered.get(1)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: DbId,
        is_prioritized: bool,
        created_at: Timestamp,
    }

    impl QueueEntry for Entry {
        fn id(&self) -> DbId {
            self.id
        }
        fn is_prioritized(&self) -> bool {
            self.is_prioritized
        }
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
    }

    fn entry(id: DbId, prioritized: bool, secs: i64) -> Entry {
        Entry {
            id,
            is_prioritized: prioritized,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn ids(entries: &[Entry]) -> Vec<DbId> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ordered = order(Vec::<Entry>::new());
        assert!(ordered.is_empty());
    }

    #[test]
    fn normal_tickets_sort_by_created_at() {
        let ordered = order(vec![entry(2, false, 10), entry(1, false, 5)]);
        assert_eq!(ids(&ordered), vec![1, 2]);
    }

    #[test]
    fn prioritized_ticket_jumps_ahead_of_earlier_normal_tickets() {
        // A(t=0), B(t=1), C(t=2, prioritized) must order as [C, A, B].
        let a = entry(1, false, 0);
        let b = entry(2, false, 1);
        let c = entry(3, true, 2);
        let ordered = order(vec![a, b, c]);
        assert_eq!(ids(&ordered), vec![3, 1, 2]);
    }

    #[test]
    fn all_prioritized_falls_back_to_created_at_order() {
        let ordered = order(vec![
            entry(3, true, 30),
            entry(1, true, 10),
            entry(2, true, 20),
        ]);
        assert_eq!(ids(&ordered), vec![1, 2, 3]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_id() {
        let ordered = order(vec![entry(9, false, 7), entry(4, false, 7)]);
        assert_eq!(ids(&ordered), vec![4, 9]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let input = vec![
            entry(1, false, 0),
            entry(2, true, 5),
            entry(3, false, 3),
            entry(4, true, 1),
        ];
        let once = order(input);
        let twice = order(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn serving_and_next_up() {
        let ordered = order(vec![entry(1, false, 0), entry(2, false, 1)]);
        assert_eq!(serving(&ordered).map(|e| e.id), Some(1));
        assert_eq!(next_up(&ordered).map(|e| e.id), Some(2));
        assert!(next_up(&ordered[..1]).is_none());
    }
}
