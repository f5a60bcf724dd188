//! Per-officer ticket number counter.

use serde::Serialize;
use sqlx::FromRow;

use qline_core::types::{DbId, Timestamp};

/// A row from the `queue_counters` table.
///
/// `counter` holds the next number to hand out, so a fresh officer starts
/// at 1. `last_reset` marks the start of the current numbering epoch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueCounter {
    pub officer_id: DbId,
    pub counter: i64,
    pub last_reset: Option<Timestamp>,
}
