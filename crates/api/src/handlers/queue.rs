//! Handlers for queue views and the queue-reset bulk operation.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use qline_core::error::CoreError;
use qline_core::ordering;
use qline_core::types::DbId;
use qline_db::models::officer::Officer;
use qline_db::models::ticket::Ticket;
use qline_db::repositories::{CounterRepo, DailyStatRepo, OfficerRepo, TicketRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::refresh_officer_stats;
use crate::response::DataResponse;
use crate::state::AppState;

/// Full queue snapshot: what the admin dashboard and the hall display poll.
#[derive(Debug, Serialize)]
pub struct QueueSnapshot {
    /// All officers, by display prefix.
    pub officers: Vec<Officer>,
    /// Waiting tickets per officer, in serving order. The head of each list
    /// is the ticket currently being served.
    pub queues: BTreeMap<DbId, Vec<Ticket>>,
    /// Next ticket number per officer.
    pub counters: BTreeMap<DbId, i64>,
}

/// GET /api/v1/queue
///
/// Snapshot of every officer's queue. Tickets are fetched in creation order
/// and ordered per officer by the ordering engine, so the serving order
/// here is identical to what per-officer reads return.
pub async fn snapshot(State(state): State<AppState>) -> AppResult<Json<DataResponse<QueueSnapshot>>> {
    let officers = OfficerRepo::list(&state.pool).await?;
    let waiting = TicketRepo::list_all_waiting(&state.pool).await?;
    let counters = CounterRepo::list(&state.pool).await?;

    let mut grouped: BTreeMap<DbId, Vec<Ticket>> = BTreeMap::new();
    for ticket in waiting {
        grouped.entry(ticket.officer_id).or_default().push(ticket);
    }
    let queues: BTreeMap<DbId, Vec<Ticket>> = grouped
        .into_iter()
        .map(|(officer_id, tickets)| (officer_id, ordering::order(tickets)))
        .collect();

    let counters = counters
        .into_iter()
        .map(|c| (c.officer_id, c.counter))
        .collect();

    Ok(Json(DataResponse {
        data: QueueSnapshot {
            officers,
            queues,
            counters,
        },
    }))
}

/// GET /api/v1/officers/{id}/queue
///
/// One officer's waiting tickets in serving order.
pub async fn officer_queue(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    ensure_officer_exists(&state, id).await?;
    let tickets = TicketRepo::list_waiting(&state.pool, id).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// Response payload for a queue reset.
#[derive(Debug, Serialize)]
pub struct ResetResult {
    pub deleted: u64,
}

/// POST /api/v1/officers/{id}/queue/reset
///
/// Delete all of the officer's tickets and restart numbering at 1. The only
/// operation that physically removes tickets.
pub async fn reset_queue(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ResetResult>>> {
    ensure_officer_exists(&state, id).await?;

    let deleted = TicketRepo::reset_officer_queue(&state.pool, id).await?;

    // Every ticket row is gone; stale aggregates from earlier days must not
    // outlive them. Re-materialize today as an all-zero row.
    DailyStatRepo::delete_for_officer(&state.pool, id).await?;
    refresh_officer_stats(&state.pool, id, Utc::now().date_naive()).await?;

    tracing::info!(officer_id = id, deleted, "Queue reset");

    Ok(Json(DataResponse {
        data: ResetResult { deleted },
    }))
}

async fn ensure_officer_exists(state: &AppState, id: DbId) -> AppResult<()> {
    OfficerRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Officer",
            id,
        }))
}
