//! Domain logic for the qline queueing service.
//!
//! This crate has zero internal dependencies so the persistence layer, the
//! API server, and any future CLI tooling can all share the same rules:
//! the ticket status state machine, the queue ordering engine, the
//! prioritization resequencing policy, and the daily statistics aggregator.

pub mod error;
pub mod ordering;
pub mod priority;
pub mod stats;
pub mod ticket;
pub mod types;
