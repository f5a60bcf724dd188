pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /queue                               full snapshot (dashboard / display poll)
///
/// /tickets                             issue a ticket (admin desk or intake)
/// /tickets/{id}/status                 serve / no-show / cancel
/// /tickets/{id}/revert                 undo within the undo window
/// /tickets/{id}/prioritize             flag + resequence
/// /tickets/{id}/transfer               move to another officer
///
/// /officers                            list, create
/// /officers/{id}                       partial update (online toggle, prefix, ...)
/// /officers/{id}/queue                 waiting list in serving order
/// /officers/{id}/queue/reset           bulk delete + counter reset
///
/// /stats/daily                         per-officer daily statistics
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/queue", get(handlers::queue::snapshot))
        .route("/tickets", post(handlers::ticket::create_ticket))
        .route("/tickets/{id}/status", post(handlers::ticket::change_status))
        .route("/tickets/{id}/revert", post(handlers::ticket::revert))
        .route(
            "/tickets/{id}/prioritize",
            post(handlers::ticket::prioritize),
        )
        .route("/tickets/{id}/transfer", post(handlers::ticket::transfer))
        .route(
            "/officers",
            get(handlers::officer::list_officers).post(handlers::officer::create_officer),
        )
        .route("/officers/{id}", patch(handlers::officer::update_officer))
        .route("/officers/{id}/queue", get(handlers::queue::officer_queue))
        .route(
            "/officers/{id}/queue/reset",
            post(handlers::queue::reset_queue),
        )
        .route("/stats/daily", get(handlers::stats::daily_stats))
}
