//! HTTP handlers, grouped by resource.

pub mod officer;
pub mod queue;
pub mod stats;
pub mod ticket;

use chrono::NaiveDate;
use qline_core::types::DbId;
use qline_db::repositories::DailyStatRepo;
use qline_db::DbPool;

use crate::error::AppResult;

/// Refresh the materialized daily stats row touched by a ticket mutation.
///
/// Statistics bucket tickets by creation date, so the date comes from the
/// mutated ticket's `created_at`, not from the clock.
pub(crate) async fn refresh_officer_stats(
    pool: &DbPool,
    officer_id: DbId,
    date: NaiveDate,
) -> AppResult<()> {
    DailyStatRepo::refresh(pool, officer_id, date).await?;
    Ok(())
}
