//! Materialized daily statistics row.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use qline_core::stats::DailyStat;
use qline_core::types::{DbId, Timestamp};

/// A row from the `daily_stats` table.
///
/// Mirrors [`DailyStat`] plus the refresh timestamp. The table is a cache of
/// the aggregator's output, never a source of truth.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyStatRow {
    pub officer_id: DbId,
    pub date: NaiveDate,
    pub total_count: i64,
    pub waiting_count: i64,
    pub served_count: i64,
    pub no_show_count: i64,
    pub transferred_count: i64,
    pub cancelled_count: i64,
    pub prioritized_count: i64,
    pub avg_waiting_secs: i64,
    pub avg_consultation_secs: i64,
    pub updated_at: Timestamp,
}

impl From<DailyStatRow> for DailyStat {
    fn from(row: DailyStatRow) -> Self {
        DailyStat {
            officer_id: row.officer_id,
            date: row.date,
            total_count: row.total_count,
            waiting_count: row.waiting_count,
            served_count: row.served_count,
            no_show_count: row.no_show_count,
            transferred_count: row.transferred_count,
            cancelled_count: row.cancelled_count,
            prioritized_count: row.prioritized_count,
            avg_waiting_secs: row.avg_waiting_secs,
            avg_consultation_secs: row.avg_consultation_secs,
        }
    }
}
