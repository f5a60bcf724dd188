//! Repository for the `officers` table.

use sqlx::PgPool;

use qline_core::types::DbId;

use crate::models::officer::{CreateOfficer, Officer, UpdateOfficer};

/// Column list for `officers` queries.
const COLUMNS: &str = "id, name, prefix, counter_type, online, created_at, updated_at";

/// Provides CRUD operations for officers.
pub struct OfficerRepo;

impl OfficerRepo {
    /// Insert a new officer. Defaults to offline until toggled.
    pub async fn create(pool: &PgPool, input: &CreateOfficer) -> Result<Officer, sqlx::Error> {
        let query = format!(
            "INSERT INTO officers (name, prefix, counter_type, online) \
             VALUES ($1, $2, $3, COALESCE($4, FALSE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Officer>(&query)
            .bind(&input.name)
            .bind(&input.prefix)
            .bind(&input.counter_type)
            .bind(input.online)
            .fetch_one(pool)
            .await
    }

    /// Find an officer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Officer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM officers WHERE id = $1");
        sqlx::query_as::<_, Officer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all officers ordered by display prefix.
    pub async fn list(pool: &PgPool) -> Result<Vec<Officer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM officers ORDER BY prefix, id");
        sqlx::query_as::<_, Officer>(&query).fetch_all(pool).await
    }

    /// First online officer serving `counter_type`, by prefix order.
    ///
    /// Intake routing: new walk-in tickets go to this officer. Returns
    /// `None` when nobody with that counter type is online.
    pub async fn first_eligible(
        pool: &PgPool,
        counter_type: &str,
    ) -> Result<Option<Officer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM officers \
             WHERE counter_type = $1 AND online = TRUE \
             ORDER BY prefix, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Officer>(&query)
            .bind(counter_type)
            .fetch_optional(pool)
            .await
    }

    /// Update an officer. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOfficer,
    ) -> Result<Option<Officer>, sqlx::Error> {
        let query = format!(
            "UPDATE officers SET \
                name = COALESCE($2, name), \
                prefix = COALESCE($3, prefix), \
                counter_type = COALESCE($4, counter_type), \
                online = COALESCE($5, online), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Officer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.prefix)
            .bind(&input.counter_type)
            .bind(input.online)
            .fetch_optional(pool)
            .await
    }
}
