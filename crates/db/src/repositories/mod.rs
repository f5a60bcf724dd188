//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must compose
//! into a caller's transaction accept `impl PgExecutor` instead.

pub mod counter_repo;
pub mod daily_stat_repo;
pub mod officer_repo;
pub mod ticket_repo;

pub use counter_repo::CounterRepo;
pub use daily_stat_repo::DailyStatRepo;
pub use officer_repo::OfficerRepo;
pub use ticket_repo::TicketRepo;
