//! Repository for the `daily_stats` materialized table.
//!
//! The table caches the output of `qline_core::stats::aggregate`. Writers
//! call [`DailyStatRepo::refresh`] after every ticket mutation; readers use
//! the cached rows and fall back to recomputing from ticket rows when a row
//! is absent. Both paths run the same aggregator, so they agree exactly.

use chrono::NaiveDate;
use sqlx::PgPool;

use qline_core::stats::{aggregate, DailyStat, TicketSnapshot};
use qline_core::types::DbId;

use crate::models::daily_stat::DailyStatRow;
use crate::models::ticket::Ticket;
use crate::repositories::TicketRepo;

/// Column list for `daily_stats` queries.
const COLUMNS: &str = "officer_id, date, total_count, waiting_count, served_count, no_show_count, \
     transferred_count, cancelled_count, prioritized_count, avg_waiting_secs, \
     avg_consultation_secs, updated_at";

/// Maintains and serves materialized daily statistics.
pub struct DailyStatRepo;

impl DailyStatRepo {
    /// Materialized rows for a date, optionally narrowed to one officer.
    pub async fn fetch(
        pool: &PgPool,
        date: NaiveDate,
        officer_id: Option<DbId>,
    ) -> Result<Vec<DailyStatRow>, sqlx::Error> {
        let filter = if officer_id.is_some() {
            "AND officer_id = $2"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM daily_stats WHERE date = $1 {filter} ORDER BY officer_id"
        );
        let mut q = sqlx::query_as::<_, DailyStatRow>(&query).bind(date);
        if let Some(id) = officer_id {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    /// Store one aggregate, replacing any previous row for the same
    /// `(officer_id, date)`.
    pub async fn upsert(pool: &PgPool, stat: &DailyStat) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO daily_stats \
                 (officer_id, date, total_count, waiting_count, served_count, no_show_count, \
                  transferred_count, cancelled_count, prioritized_count, avg_waiting_secs, \
                  avg_consultation_secs, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW()) \
             ON CONFLICT (officer_id, date) DO UPDATE SET \
                 total_count = EXCLUDED.total_count, \
                 waiting_count = EXCLUDED.waiting_count, \
                 served_count = EXCLUDED.served_count, \
                 no_show_count = EXCLUDED.no_show_count, \
                 transferred_count = EXCLUDED.transferred_count, \
                 cancelled_count = EXCLUDED.cancelled_count, \
                 prioritized_count = EXCLUDED.prioritized_count, \
                 avg_waiting_secs = EXCLUDED.avg_waiting_secs, \
                 avg_consultation_secs = EXCLUDED.avg_consultation_secs, \
                 updated_at = NOW()",
        )
        .bind(stat.officer_id)
        .bind(stat.date)
        .bind(stat.total_count)
        .bind(stat.waiting_count)
        .bind(stat.served_count)
        .bind(stat.no_show_count)
        .bind(stat.transferred_count)
        .bind(stat.cancelled_count)
        .bind(stat.prioritized_count)
        .bind(stat.avg_waiting_secs)
        .bind(stat.avg_consultation_secs)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Recompute one officer's aggregate for a date from ticket rows and
    /// store it. Returns the freshly computed value.
    pub async fn refresh(
        pool: &PgPool,
        officer_id: DbId,
        date: NaiveDate,
    ) -> Result<DailyStat, sqlx::Error> {
        let tickets = TicketRepo::list_for_officer_on_date(pool, officer_id, date).await?;
        let stat = Self::compute(officer_id, date, &tickets)?;
        Self::upsert(pool, &stat).await?;
        tracing::debug!(officer_id, %date, total = stat.total_count, "Daily stats refreshed");
        Ok(stat)
    }

    /// Drop every materialized row for an officer, any date.
    ///
    /// Used by the queue-reset bulk operation: once the ticket rows are
    /// gone, stale aggregates from earlier days must not outlive them.
    pub async fn delete_for_officer(pool: &PgPool, officer_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM daily_stats WHERE officer_id = $1")
            .bind(officer_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Run the aggregator over already-fetched ticket rows.
    ///
    /// Shared by [`DailyStatRepo::refresh`] and the read path's fallback so
    /// the two cannot drift.
    pub fn compute(
        officer_id: DbId,
        date: NaiveDate,
        tickets: &[Ticket],
    ) -> Result<DailyStat, sqlx::Error> {
        let snapshots = tickets
            .iter()
            .map(|t| t.snapshot().map_err(|e| sqlx::Error::Decode(Box::new(e))))
            .collect::<Result<Vec<TicketSnapshot>, _>>()?;
        Ok(aggregate(officer_id, date, &snapshots))
    }
}
