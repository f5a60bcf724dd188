//! Handlers for the `/officers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use qline_core::error::CoreError;
use qline_core::types::DbId;
use qline_db::models::officer::{CreateOfficer, Officer, UpdateOfficer};
use qline_db::repositories::OfficerRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/officers
pub async fn list_officers(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Officer>>>> {
    let officers = OfficerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: officers }))
}

/// POST /api/v1/officers
pub async fn create_officer(
    State(state): State<AppState>,
    Json(input): Json<CreateOfficer>,
) -> AppResult<(StatusCode, Json<DataResponse<Officer>>)> {
    for (field, value) in [
        ("name", &input.name),
        ("prefix", &input.prefix),
        ("counter_type", &input.counter_type),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "{field} must not be empty"
            ))));
        }
    }

    let officer = OfficerRepo::create(&state.pool, &input).await?;
    tracing::info!(officer_id = officer.id, prefix = %officer.prefix, "Officer created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: officer })))
}

/// PATCH /api/v1/officers/{id}
///
/// Partial update; toggling `online` is the dashboard's standby switch.
pub async fn update_officer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOfficer>,
) -> AppResult<Json<DataResponse<Officer>>> {
    let officer = OfficerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Officer",
            id,
        }))?;
    Ok(Json(DataResponse { data: officer }))
}
