//! Handlers for the `/tickets` resource: creation, status transitions,
//! undo, prioritization, and transfer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::ValidateEmail;

use qline_core::error::CoreError;
use qline_core::priority::resequenced_created_at;
use qline_core::ticket::{validate_transition, TicketStatus};
use qline_core::types::DbId;
use qline_db::models::officer::Officer;
use qline_db::models::ticket::{ChangeStatus, CreateTicket, Ticket, TransferTicket};
use qline_db::repositories::{OfficerRepo, TicketRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::refresh_officer_stats;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tickets
///
/// Issue a new queue ticket. Two routing modes:
/// - `officer_id`: queue directly for that officer (admin desk).
/// - `counter_type`: route to the first online officer serving that
///   category (public intake form).
///
/// The ticket number comes from the officer's counter; allocation and
/// insert commit together, so a store failure leaves no orphan ticket.
pub async fn create_ticket(
    State(state): State<AppState>,
    Json(input): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    let officer = resolve_officer(&state, &input).await?;
    validate_intake_email(&state, &input)?;

    let ticket = TicketRepo::create(&state.pool, officer.id, &input).await?;
    refresh_officer_stats(&state.pool, officer.id, ticket.created_at.date_naive()).await?;

    tracing::info!(
        ticket_id = ticket.id,
        officer_id = officer.id,
        number = ticket.number,
        "Ticket issued"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// POST /api/v1/tickets/{id}/status
///
/// Transition a waiting ticket to `served`, `no_show`, or `cancelled`.
/// Transfers go through their own endpoint so the destination row is
/// created in the same transaction.
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatus>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    if input.status == TicketStatus::Transferred {
        return Err(AppError::BadRequest(
            "use the transfer endpoint to move a ticket".to_string(),
        ));
    }
    // Rejects `waiting` (and any future non-target) up front.
    validate_transition(TicketStatus::Waiting, input.status)?;

    let Some(ticket) = TicketRepo::transition(&state.pool, id, input.status).await? else {
        return Err(transition_failure(&state, id, input.status).await?);
    };

    refresh_officer_stats(&state.pool, ticket.officer_id, ticket.created_at.date_naive()).await?;

    tracing::info!(
        ticket_id = ticket.id,
        officer_id = ticket.officer_id,
        status = %input.status,
        "Ticket status changed"
    );

    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/revert
///
/// Undo a just-applied serve/no-show/cancel, restoring the ticket to
/// `waiting`. Only allowed while the transition is younger than the
/// configured undo window; afterwards the action is committed.
pub async fn revert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let window = state.config.undo_window_secs;
    let Some(ticket) = TicketRepo::revert(&state.pool, id, window).await? else {
        return Err(revert_failure(&state, id).await?);
    };

    refresh_officer_stats(&state.pool, ticket.officer_id, ticket.created_at.date_naive()).await?;

    tracing::info!(ticket_id = ticket.id, officer_id = ticket.officer_id, "Ticket reverted");

    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/prioritize
///
/// Flag a waiting ticket as prioritized and resequence it directly behind
/// the currently-serving head. Prioritizing a ticket already at the head
/// or next up changes nothing; repeating the call does not shift further.
pub async fn prioritize(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let Some(ticket) = TicketRepo::set_prioritized(&state.pool, id).await? else {
        match TicketRepo::find_by_id(&state.pool, id).await? {
            None => {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Ticket",
                    id,
                }))
            }
            Some(existing) => {
                return Err(AppError::Core(CoreError::InvalidState(format!(
                    "only waiting tickets can be prioritized, ticket is {}",
                    existing.status
                ))))
            }
        }
    };

    let waiting = TicketRepo::list_waiting(&state.pool, ticket.officer_id).await?;
    if let Some(created_at) = resequenced_created_at(&waiting, ticket.id) {
        TicketRepo::rewrite_created_at(&state.pool, ticket.id, created_at).await?;
    }

    refresh_officer_stats(&state.pool, ticket.officer_id, ticket.created_at.date_naive()).await?;

    tracing::info!(ticket_id = ticket.id, officer_id = ticket.officer_id, "Ticket prioritized");

    // Re-read so the response reflects a rewritten `created_at`.
    let fresh = TicketRepo::find_by_id(&state.pool, ticket.id)
        .await?
        .unwrap_or(ticket);
    Ok(Json(DataResponse { data: fresh }))
}

/// POST /api/v1/tickets/{id}/transfer
///
/// Move a waiting ticket to another officer. The source row becomes
/// `transferred` and a fresh `waiting` row appears under the target, both
/// in one transaction; total waiting count across officers is unchanged.
pub async fn transfer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TransferTicket>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let target = OfficerRepo::find_by_id(&state.pool, input.target_officer_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Officer",
            id: input.target_officer_id,
        }))?;

    let source = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;
    if source.officer_id == target.id {
        return Err(AppError::BadRequest(
            "cannot transfer a ticket to its current officer".to_string(),
        ));
    }

    let Some(destination) = TicketRepo::transfer(&state.pool, id, target.id).await? else {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "only waiting tickets can be transferred, ticket is {}",
            source.status
        ))));
    };

    // Both sides of the move change that day's numbers.
    refresh_officer_stats(&state.pool, source.officer_id, source.created_at.date_naive()).await?;
    refresh_officer_stats(
        &state.pool,
        destination.officer_id,
        destination.created_at.date_naive(),
    )
    .await?;

    tracing::info!(
        ticket_id = id,
        from_officer = source.officer_id,
        to_officer = destination.officer_id,
        "Ticket transferred"
    );

    Ok(Json(DataResponse { data: destination }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the officer a new ticket is queued for.
async fn resolve_officer(state: &AppState, input: &CreateTicket) -> AppResult<Officer> {
    match (input.officer_id, input.counter_type.as_deref()) {
        (Some(id), _) => OfficerRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Officer",
                id,
            })),
        (None, Some(counter_type)) => OfficerRepo::first_eligible(&state.pool, counter_type)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "no online officer for counter type '{counter_type}'"
                )))
            }),
        (None, None) => Err(AppError::BadRequest(
            "officer_id or counter_type is required".to_string(),
        )),
    }
}

/// Check an intake email: well-formed, and within the configured domain.
fn validate_intake_email(state: &AppState, input: &CreateTicket) -> AppResult<()> {
    let Some(email) = input.email.as_deref() else {
        return Ok(());
    };
    if !email.validate_email() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        ))));
    }
    if let Some(domain) = state.config.intake_email_domain.as_deref() {
        if !email.ends_with(domain) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "email must end with {domain}"
            ))));
        }
    }
    Ok(())
}

/// Build the error for a transition whose compare-and-set matched no row.
async fn transition_failure(
    state: &AppState,
    id: DbId,
    target: TicketStatus,
) -> Result<AppError, AppError> {
    let Some(ticket) = TicketRepo::find_by_id(&state.pool, id).await? else {
        return Ok(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }));
    };
    match validate_transition(ticket.parsed_status()?, target) {
        Err(err) => Ok(err.into()),
        // The ticket was waiting again by the time we looked: a concurrent
        // writer won the race between the UPDATE and this read.
        Ok(()) => Ok(AppError::Core(CoreError::InvalidState(
            "ticket changed concurrently, please retry".to_string(),
        ))),
    }
}

/// Build the error for a revert whose compare-and-set matched no row.
async fn revert_failure(state: &AppState, id: DbId) -> Result<AppError, AppError> {
    let Some(ticket) = TicketRepo::find_by_id(&state.pool, id).await? else {
        return Ok(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }));
    };
    let message = match ticket.parsed_status()? {
        TicketStatus::Waiting => "ticket is already waiting".to_string(),
        TicketStatus::Transferred => "transferred tickets cannot be reverted".to_string(),
        _ => "undo window has elapsed".to_string(),
    };
    Ok(AppError::Core(CoreError::InvalidState(message)))
}
