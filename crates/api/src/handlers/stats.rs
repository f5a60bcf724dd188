//! Handlers for daily statistics.
//!
//! The read path prefers the materialized `daily_stats` rows and falls back
//! to recomputing from raw ticket rows when none exist for the requested
//! date. Both paths run the same aggregator, so a client cannot tell which
//! one answered.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use qline_core::error::CoreError;
use qline_core::stats::DailyStat;
use qline_core::types::DbId;
use qline_db::models::officer::Officer;
use qline_db::models::ticket::Ticket;
use qline_db::repositories::{DailyStatRepo, OfficerRepo, TicketRepo};
use qline_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts for the fallback's ticket fetch before giving up.
const FETCH_ATTEMPTS: u32 = 3;

/// Delay between fallback fetch attempts.
const FETCH_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Query parameters for `GET /stats/daily`.
#[derive(Debug, Deserialize)]
pub struct DailyStatsQuery {
    /// UTC date (`YYYY-MM-DD`). Defaults to today.
    pub date: Option<NaiveDate>,
    /// Narrow the result to one officer.
    pub officer_id: Option<DbId>,
}

/// GET /api/v1/stats/daily
pub async fn daily_stats(
    State(state): State<AppState>,
    Query(params): Query<DailyStatsQuery>,
) -> AppResult<Json<DataResponse<Vec<DailyStat>>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let rows = DailyStatRepo::fetch(&state.pool, date, params.officer_id).await?;
    if !rows.is_empty() {
        let stats = rows.into_iter().map(DailyStat::from).collect();
        return Ok(Json(DataResponse { data: stats }));
    }

    // Fallback: recompute from ticket rows. Officers with no tickets on the
    // date still get an all-zero row, matching what a refreshed
    // materialized view would hold.
    let officers = match params.officer_id {
        Some(id) => vec![OfficerRepo::find_by_id(&state.pool, id).await?.ok_or(
            AppError::Core(CoreError::NotFound {
                entity: "Officer",
                id,
            }),
        )?],
        None => OfficerRepo::list(&state.pool).await?,
    };

    let tickets = fetch_tickets_with_retry(&state.pool, date).await?;
    let stats = compute_for_officers(&officers, date, tickets)?;

    Ok(Json(DataResponse { data: stats }))
}

/// Fetch the date's tickets, retrying transient store failures a few times
/// before surfacing the error.
async fn fetch_tickets_with_retry(pool: &DbPool, date: NaiveDate) -> AppResult<Vec<Ticket>> {
    let mut last_error = None;
    for attempt in 1..=FETCH_ATTEMPTS {
        match TicketRepo::list_on_date(pool, date).await {
            Ok(tickets) => return Ok(tickets),
            Err(err) => {
                tracing::warn!(attempt, error = %err, "Stats fallback fetch failed");
                last_error = Some(err);
                if attempt < FETCH_ATTEMPTS {
                    tokio::time::sleep(FETCH_RETRY_DELAY).await;
                }
            }
        }
    }
    Err(AppError::Core(CoreError::StoreUnavailable(
        last_error.map(|e| e.to_string()).unwrap_or_default(),
    )))
}

/// Aggregate fetched tickets per officer.
fn compute_for_officers(
    officers: &[Officer],
    date: NaiveDate,
    tickets: Vec<Ticket>,
) -> AppResult<Vec<DailyStat>> {
    let mut grouped: HashMap<DbId, Vec<Ticket>> = HashMap::new();
    for ticket in tickets {
        grouped.entry(ticket.officer_id).or_default().push(ticket);
    }

    let mut stats = Vec::with_capacity(officers.len());
    for officer in officers {
        let officer_tickets = grouped.remove(&officer.id).unwrap_or_default();
        stats.push(DailyStatRepo::compute(officer.id, date, &officer_tickets)?);
    }
    Ok(stats)
}
