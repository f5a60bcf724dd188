//! Daily statistics aggregator.
//!
//! Derives per-officer, per-day counts and average durations from ticket
//! rows. The persistence layer materializes the result into a table after
//! every write, and the read path falls back to recomputing from raw rows
//! when the materialized row is missing; both paths run [`aggregate`], so
//! they agree exactly.
//!
//! Averages are whole seconds (integer floor). `avg_waiting_secs` covers
//! every ticket that left `waiting`; `avg_consultation_secs` covers served
//! tickets only. Tickets without an `updated_at` are excluded from the
//! averages rather than counted as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ticket::TicketStatus;
use crate::types::{DbId, Timestamp};

/// The slice of a ticket row the aggregator needs.
#[derive(Debug, Clone)]
pub struct TicketSnapshot {
    pub status: TicketStatus,
    pub is_prioritized: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Per-officer, per-day aggregate of ticket outcomes.
///
/// Derived, never authoritative: always reproducible from ticket rows alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub officer_id: DbId,
    pub date: NaiveDate,
    pub total_count: i64,
    pub waiting_count: i64,
    pub served_count: i64,
    pub no_show_count: i64,
    pub transferred_count: i64,
    pub cancelled_count: i64,
    /// Waiting tickets currently flagged prioritized. A snapshot metric,
    /// not cumulative.
    pub prioritized_count: i64,
    pub avg_waiting_secs: i64,
    pub avg_consultation_secs: i64,
}

impl DailyStat {
    /// An all-zero stat row for an officer with no tickets on `date`.
    pub fn empty(officer_id: DbId, date: NaiveDate) -> Self {
        Self {
            officer_id,
            date,
            total_count: 0,
            waiting_count: 0,
            served_count: 0,
            no_show_count: 0,
            transferred_count: 0,
            cancelled_count: 0,
            prioritized_count: 0,
            avg_waiting_secs: 0,
            avg_consultation_secs: 0,
        }
    }
}

/// Aggregate one officer's tickets created on `date`.
///
/// The caller is responsible for passing only that officer's tickets for
/// that date; the function itself is a pure fold over the slice.
pub fn aggregate(officer_id: DbId, date: NaiveDate, tickets: &[TicketSnapshot]) -> DailyStat {
    let mut stat = DailyStat::empty(officer_id, date);

    let mut waiting_total_secs: i64 = 0;
    let mut waiting_samples: i64 = 0;
    let mut consultation_total_secs: i64 = 0;
    let mut consultation_samples: i64 = 0;

    for ticket in tickets {
        stat.total_count += 1;
        match ticket.status {
            TicketStatus::Waiting => stat.waiting_count += 1,
            TicketStatus::Served => stat.served_count += 1,
            TicketStatus::NoShow => stat.no_show_count += 1,
            TicketStatus::Transferred => stat.transferred_count += 1,
            TicketStatus::Cancelled => stat.cancelled_count += 1,
        }
        if ticket.status == TicketStatus::Waiting && ticket.is_prioritized {
            stat.prioritized_count += 1;
        }

        if ticket.status.is_terminal() {
            if let Some(updated_at) = ticket.updated_at {
                let secs = (updated_at - ticket.created_at).num_seconds();
                waiting_total_secs += secs;
                waiting_samples += 1;
                if ticket.status == TicketStatus::Served {
                    consultation_total_secs += secs;
                    consultation_samples += 1;
                }
            }
        }
    }

    if waiting_samples > 0 {
        stat.avg_waiting_secs = waiting_total_secs / waiting_samples;
    }
    if consultation_samples > 0 {
        stat.avg_consultation_secs = consultation_total_secs / consultation_samples;
    }

    stat
}
