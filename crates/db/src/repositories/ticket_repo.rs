//! Repository for the `tickets` table.
//!
//! Status changes are compare-and-set UPDATEs guarded on the current status,
//! so two officers racing on the same ticket resolve to one winner; there is
//! no row locking. Multi-row operations (create with number allocation,
//! transfer) run inside a single transaction.

use chrono::NaiveDate;
use sqlx::PgPool;

use qline_core::ticket::TicketStatus;
use qline_core::types::{DbId, Timestamp};

use crate::models::ticket::{CreateTicket, Ticket};
use crate::repositories::CounterRepo;

/// Column list for `tickets` queries.
const COLUMNS: &str = "id, officer_id, number, status, is_prioritized, priority_timestamp, \
     full_name, college, organization, email, created_at, updated_at";

/// Serving order: prioritized first, then creation time, id as tie-break.
/// Must match the ordering engine in `qline_core::ordering`.
const SERVING_ORDER: &str = "is_prioritized DESC, created_at ASC, id ASC";

/// Provides CRUD and state-transition operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new waiting ticket, allocating its number from the officer's
    /// counter inside the same transaction.
    pub async fn create(
        pool: &PgPool,
        officer_id: DbId,
        input: &CreateTicket,
    ) -> Result<Ticket, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let number = CounterRepo::allocate(&mut *tx, officer_id).await?;

        let query = format!(
            "INSERT INTO tickets (officer_id, number, status, full_name, college, organization, email) \
             VALUES ($1, $2, 'waiting', $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&query)
            .bind(officer_id)
            .bind(number)
            .bind(&input.full_name)
            .bind(&input.college)
            .bind(&input.organization)
            .bind(&input.email)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ticket)
    }

    /// Find a ticket by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One officer's waiting tickets in serving order.
    pub async fn list_waiting(pool: &PgPool, officer_id: DbId) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE officer_id = $1 AND status = 'waiting' \
             ORDER BY {SERVING_ORDER}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(officer_id)
            .fetch_all(pool)
            .await
    }

    /// All waiting tickets across officers, in creation order. Callers group
    /// by officer and apply the ordering engine per queue.
    pub async fn list_all_waiting(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE status = 'waiting' ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    /// One officer's tickets created on `date` (UTC day), any status.
    pub async fn list_for_officer_on_date(
        pool: &PgPool,
        officer_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        // The naive date is anchored to UTC explicitly so the day window
        // does not depend on the server's timezone setting.
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE officer_id = $1 \
               AND created_at >= ($2::timestamp AT TIME ZONE 'UTC') \
               AND created_at < (($2 + INTERVAL '1 day')::timestamp AT TIME ZONE 'UTC') \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(officer_id)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// All tickets created on `date` (UTC day), any status, any officer.
    pub async fn list_on_date(pool: &PgPool, date: NaiveDate) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE created_at >= ($1::timestamp AT TIME ZONE 'UTC') \
               AND created_at < (($1 + INTERVAL '1 day')::timestamp AT TIME ZONE 'UTC') \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Transition a waiting ticket to a terminal status.
    ///
    /// Compare-and-set: the UPDATE only matches while the ticket is still
    /// `waiting`, clears the priority flag, and stamps `updated_at`. Returns
    /// `None` when the ticket does not exist or already left `waiting`; the
    /// caller distinguishes the two with [`TicketRepo::find_by_id`].
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        to: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets \
             SET status = $2, is_prioritized = FALSE, updated_at = NOW() \
             WHERE id = $1 AND status = 'waiting' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Revert a just-transitioned ticket back to `waiting`.
    ///
    /// Only `served`, `no_show`, and `cancelled` tickets are revertible, and
    /// only while the transition is younger than `window_secs`. The window
    /// check is part of the UPDATE predicate, so an expired undo can never
    /// race past it.
    pub async fn revert(
        pool: &PgPool,
        id: DbId,
        window_secs: i64,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets \
             SET status = 'waiting', updated_at = NOW() \
             WHERE id = $1 \
               AND status IN ('served', 'no_show', 'cancelled') \
               AND updated_at >= NOW() - make_interval(secs => $2::double precision) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(window_secs)
            .fetch_optional(pool)
            .await
    }

    /// Flag a waiting ticket as prioritized.
    ///
    /// Idempotent: re-flagging an already prioritized ticket just refreshes
    /// `priority_timestamp`. Returns `None` when the ticket does not exist
    /// or is not waiting.
    pub async fn set_prioritized(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets \
             SET is_prioritized = TRUE, priority_timestamp = NOW() \
             WHERE id = $1 AND status = 'waiting' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rewrite a ticket's `created_at`, resequencing its queue position.
    ///
    /// Used only by the prioritization policy; `created_at` doubles as the
    /// rank key.
    pub async fn rewrite_created_at(
        pool: &PgPool,
        id: DbId,
        created_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tickets SET created_at = $2 WHERE id = $1")
            .bind(id)
            .bind(created_at)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transfer a waiting ticket to another officer.
    ///
    /// One transaction: the source row moves `waiting -> transferred` via
    /// compare-and-set, then a fresh `waiting` row is inserted under the
    /// target officer with the same number, demographics, and `created_at`
    /// (the visitor keeps their temporal place in the new queue). Returns
    /// the destination row, or `None` when the source row was missing or no
    /// longer waiting (the transaction rolls back).
    pub async fn transfer(
        pool: &PgPool,
        id: DbId,
        target_officer_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let source_query = format!(
            "UPDATE tickets \
             SET status = 'transferred', is_prioritized = FALSE, updated_at = NOW() \
             WHERE id = $1 AND status = 'waiting' \
             RETURNING {COLUMNS}"
        );
        let source = sqlx::query_as::<_, Ticket>(&source_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(source) = source else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert_query = format!(
            "INSERT INTO tickets \
                 (officer_id, number, status, full_name, college, organization, email, created_at) \
             VALUES ($1, $2, 'waiting', $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let destination = sqlx::query_as::<_, Ticket>(&insert_query)
            .bind(target_officer_id)
            .bind(source.number)
            .bind(&source.full_name)
            .bind(&source.college)
            .bind(&source.organization)
            .bind(&source.email)
            .bind(source.created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(destination))
    }

    /// Delete all of an officer's tickets and reset their counter to 1.
    ///
    /// The queue-reset bulk operation; returns the number of deleted rows.
    pub async fn reset_officer_queue(pool: &PgPool, officer_id: DbId) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM tickets WHERE officer_id = $1")
            .bind(officer_id)
            .execute(&mut *tx)
            .await?;

        CounterRepo::reset(&mut *tx, officer_id).await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
