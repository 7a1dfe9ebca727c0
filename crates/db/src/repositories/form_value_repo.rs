//! Repository for the `form_values` side table.

use cabinet_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::form::FormValueRow;

const COLUMNS: &str = "id, form_id, property_id, value";

/// One row per `(form_id, property_id)`; written only through
/// [`crate::repositories::FormRepo::save`].
pub struct FormValueRepo;

impl FormValueRepo {
    pub async fn find(
        pool: &PgPool,
        form_id: DbId,
        property_id: DbId,
    ) -> Result<Option<FormValueRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM form_values WHERE form_id = $1 AND property_id = $2");
        sqlx::query_as::<_, FormValueRow>(&query)
            .bind(form_id)
            .bind(property_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_form(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Vec<FormValueRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM form_values WHERE form_id = $1 ORDER BY property_id");
        sqlx::query_as::<_, FormValueRow>(&query)
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or overwrite a value, returning its row ID.
    pub async fn upsert(
        conn: &mut PgConnection,
        form_id: DbId,
        property_id: DbId,
        value: Option<&str>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO form_values (form_id, property_id, value) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (form_id, property_id) DO UPDATE SET value = EXCLUDED.value \
             RETURNING id",
        )
        .bind(form_id)
        .bind(property_id)
        .bind(value)
        .fetch_one(conn)
        .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(
        conn: &mut PgConnection,
        form_id: DbId,
        property_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_values WHERE form_id = $1 AND property_id = $2")
            .bind(form_id)
            .bind(property_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
