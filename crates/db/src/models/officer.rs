//! Officer entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use qline_core::types::{DbId, Timestamp};

/// A row from the `officers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Officer {
    pub id: DbId,
    pub name: String,
    /// Display label prefixed to ticket numbers (e.g. `B` -> `B12`).
    pub prefix: String,
    /// Service category used to route intake tickets to an eligible officer.
    pub counter_type: String,
    /// Whether the officer accepts new tickets and appears on the display.
    pub online: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an officer via `POST /api/v1/officers`.
#[derive(Debug, Deserialize)]
pub struct CreateOfficer {
    pub name: String,
    pub prefix: String,
    pub counter_type: String,
    pub online: Option<bool>,
}

/// DTO for updating an officer. Only non-`None` fields are applied; toggling
/// `online` is the standby switch on the dashboard.
#[derive(Debug, Deserialize)]
pub struct UpdateOfficer {
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub counter_type: Option<String>,
    pub online: Option<bool>,
}
