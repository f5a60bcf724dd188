//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the requests that mutate the entity

pub mod counter;
pub mod daily_stat;
pub mod officer;
pub mod ticket;
