//! Repository for the `queue_counters` table (per-officer number sequences).

use sqlx::{PgExecutor, PgPool};

use qline_core::types::DbId;

use crate::models::counter::QueueCounter;

/// Column list for `queue_counters` queries.
const COLUMNS: &str = "officer_id, counter, last_reset";

/// Allocates and resets per-officer ticket numbers.
pub struct CounterRepo;

impl CounterRepo {
    /// Allocate the next ticket number for an officer.
    ///
    /// Returns the current counter value (1 for an officer with no counter
    /// row yet) and atomically stores `counter + 1`, all in a single upsert
    /// so concurrent allocations never hand out the same number.
    ///
    /// Accepts any executor so ticket creation can run it inside the same
    /// transaction as the insert: a failed allocation must not leave an
    /// orphan ticket, and vice versa.
    pub async fn allocate(
        executor: impl PgExecutor<'_>,
        officer_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        // The upsert stores the NEXT value; RETURNING sees the stored row,
        // so `counter - 1` is the number handed out by this call.
        sqlx::query_scalar(
            "INSERT INTO queue_counters (officer_id, counter) \
             VALUES ($1, 2) \
             ON CONFLICT (officer_id) \
             DO UPDATE SET counter = queue_counters.counter + 1 \
             RETURNING counter - 1",
        )
        .bind(officer_id)
        .fetch_one(executor)
        .await
    }

    /// Reset an officer's counter to 1, starting a new numbering epoch.
    pub async fn reset(executor: impl PgExecutor<'_>, officer_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO queue_counters (officer_id, counter, last_reset) \
             VALUES ($1, 1, NOW()) \
             ON CONFLICT (officer_id) \
             DO UPDATE SET counter = 1, last_reset = NOW()",
        )
        .bind(officer_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Find one officer's counter row.
    pub async fn find(pool: &PgPool, officer_id: DbId) -> Result<Option<QueueCounter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_counters WHERE officer_id = $1");
        sqlx::query_as::<_, QueueCounter>(&query)
            .bind(officer_id)
            .fetch_optional(pool)
            .await
    }

    /// List all counter rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<QueueCounter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queue_counters ORDER BY officer_id");
        sqlx::query_as::<_, QueueCounter>(&query)
            .fetch_all(pool)
            .await
    }
}
