//! Ticket entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use qline_core::error::CoreError;
use qline_core::ordering::QueueEntry;
use qline_core::stats::TicketSnapshot;
use qline_core::ticket::TicketStatus;
use qline_core::types::{DbId, Timestamp};

/// A row from the `tickets` table.
///
/// `status` is kept in its raw text form; the status CHECK constraint keeps
/// the column within the known values, and [`Ticket::parsed_status`] lifts
/// it into [`TicketStatus`] for domain logic.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub officer_id: DbId,
    pub number: i64,
    pub status: String,
    pub is_prioritized: bool,
    pub priority_timestamp: Option<Timestamp>,
    pub full_name: Option<String>,
    pub college: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Ticket {
    /// Parse the raw status column.
    pub fn parsed_status(&self) -> Result<TicketStatus, CoreError> {
        TicketStatus::parse(&self.status)
            .ok_or_else(|| CoreError::Internal(format!("corrupt ticket status: {}", self.status)))
    }

    /// Project this row into the slice the statistics aggregator consumes.
    pub fn snapshot(&self) -> Result<TicketSnapshot, CoreError> {
        Ok(TicketSnapshot {
            status: self.parsed_status()?,
            is_prioritized: self.is_prioritized,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl QueueEntry for Ticket {
    fn id(&self) -> DbId {
        self.id
    }
    fn is_prioritized(&self) -> bool {
        self.is_prioritized
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// DTO for creating a ticket via `POST /api/v1/tickets`.
///
/// Exactly one routing mode applies: an explicit `officer_id` (admin desk)
/// or a `counter_type` routed to the first online officer (public intake).
#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub officer_id: Option<DbId>,
    pub counter_type: Option<String>,
    pub full_name: Option<String>,
    pub college: Option<String>,
    pub organization: Option<String>,
    pub email: Option<String>,
}

/// DTO for `POST /api/v1/tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatus {
    pub status: TicketStatus,
}

/// DTO for `POST /api/v1/tickets/{id}/transfer`.
#[derive(Debug, Deserialize)]
pub struct TransferTicket {
    pub target_officer_id: DbId,
}
