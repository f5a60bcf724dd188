//! Ticket status values and the transition state machine.
//!
//! A ticket is `waiting` from the moment it is issued until an officer acts
//! on it. Every other status is terminal under the issuing officer:
//! transitions are validated against a lookup table rather than scattered
//! conditionals so the full transition set stays exhaustively testable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status of a queue ticket, stored as lowercase text in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    Served,
    NoShow,
    Transferred,
    Cancelled,
}

/// All statuses, in the order they appear in statistics.
pub const ALL_STATUSES: [TicketStatus; 5] = [
    TicketStatus::Waiting,
    TicketStatus::Served,
    TicketStatus::NoShow,
    TicketStatus::Transferred,
    TicketStatus::Cancelled,
];

impl TicketStatus {
    /// Database/text representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::Served => "served",
            TicketStatus::NoShow => "no_show",
            TicketStatus::Transferred => "transferred",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a database/text representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(TicketStatus::Waiting),
            "served" => Some(TicketStatus::Served),
            "no_show" => Some(TicketStatus::NoShow),
            "transferred" => Some(TicketStatus::Transferred),
            "cancelled" => Some(TicketStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether a ticket in this status has left the waiting queue.
    pub fn is_terminal(self) -> bool {
        self != TicketStatus::Waiting
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TicketStatus::parse(&value).ok_or_else(|| format!("unknown ticket status: {value}"))
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of valid target statuses reachable from `from`.
///
/// `waiting` is the only status with outgoing transitions; everything else
/// returns an empty slice. (A `transferred` ticket re-enters `waiting` under
/// a new officer as a fresh row, which is not a transition of this row.)
pub fn valid_transitions(from: TicketStatus) -> &'static [TicketStatus] {
    match from {
        TicketStatus::Waiting => &[
            TicketStatus::Served,
            TicketStatus::NoShow,
            TicketStatus::Transferred,
            TicketStatus::Cancelled,
        ],
        TicketStatus::Served
        | TicketStatus::NoShow
        | TicketStatus::Transferred
        | TicketStatus::Cancelled => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: TicketStatus, to: TicketStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a transition, returning [`CoreError::InvalidState`] for invalid ones.
pub fn validate_transition(from: TicketStatus, to: TicketStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "cannot transition ticket from {from} to {to}"
        )))
    }
}
