//! Prioritization resequencing policy.
//!
//! Prioritizing a ticket sets its `is_prioritized` flag, which already moves
//! it ahead of every normal ticket. To also place it ahead of previously
//! prioritized tickets -- directly behind whoever is currently being served --
//! the policy rewrites the ticket's `created_at` to sit just after the head
//! of the waiting list. Reusing the one sort key keeps the ordering engine a
//! plain timestamp sort; the cost is that `created_at` is no longer a pure
//! audit field.

use chrono::Duration;

use crate::ordering::QueueEntry;
use crate::types::{DbId, Timestamp};

/// Gap placed between the serving head and a resequenced ticket.
pub const RESEQUENCE_STEP_MS: i64 = 1;

/// Compute the rewritten `created_at` for a ticket being prioritized.
///
/// `ordered_waiting` is the officer's waiting list in serving order. Returns
/// `None` when no rewrite is needed: the ticket is already at the head
/// (never displace the serving ticket), already next up, or not in the list
/// at all. Applying the policy twice yields the same timestamp, so repeated
/// prioritization cannot shift the ticket further.
pub fn resequenced_created_at<T: QueueEntry>(
    ordered_waiting: &[T],
    ticket_id: DbId,
) -> Option<Timestamp> {
    let position = ordered_waiting.iter().position(|t| t.id() == ticket_id)?;
    if position <= 1 {
        return None;
    }
    let head = ordered_waiting.first()?;
    Some(head.created_at() + Duration::milliseconds(RESEQUENCE_STEP_MS))
}
