//! Repository for the `forms` table and the save of a whole [`Form`].

use cabinet_core::form::{Form, FormRecord};
use cabinet_core::types::DbId;
use sqlx::PgPool;

use super::FormValueRepo;
use crate::models::form::FormRow;

const COLUMNS: &str = "id, user_id, template_id, status, created_at, updated_at";

pub struct FormRepo;

impl FormRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FormRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1");
        sqlx::query_as::<_, FormRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The form owned by a user, if any.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<FormRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE user_id = $1");
        sqlx::query_as::<_, FormRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Write the form row and its pending property changes in one
    /// transaction, then mark the form as saved.
    ///
    /// Only dirty values are written; cleared properties lose their row.
    /// Callers validate first.
    pub async fn save(pool: &PgPool, form: &mut Form) -> Result<FormRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row = match form.id() {
            None => {
                let query = format!(
                    "INSERT INTO forms (user_id, template_id, status) \
                     VALUES ($1, $2, $3) \
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, FormRow>(&query)
                    .bind(form.user_id())
                    .bind(form.template_id())
                    .bind(form.status().as_str())
                    .fetch_one(&mut *tx)
                    .await?
            }
            Some(id) => {
                let query = format!(
                    "UPDATE forms SET user_id = $2, status = $3 \
                     WHERE id = $1 \
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, FormRow>(&query)
                    .bind(id)
                    .bind(form.user_id())
                    .bind(form.status().as_str())
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        let changes = form.changes();
        let mut saved = Vec::with_capacity(changes.upserts.len());
        for (property_id, value) in &changes.upserts {
            let value_id =
                FormValueRepo::upsert(&mut *tx, row.id, *property_id, value.as_deref()).await?;
            saved.push((*property_id, value_id));
        }
        for property_id in &changes.removals {
            FormValueRepo::delete(&mut *tx, row.id, *property_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            form_id = row.id,
            written = saved.len(),
            removed = changes.removals.len(),
            "Form saved",
        );

        let status = form.status();
        form.mark_saved(
            FormRecord {
                id: row.id,
                user_id: row.user_id,
                template_id: row.template_id,
                status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            &saved,
        );
        Ok(row)
    }

    /// Returns `true` if a row was deleted. Values go with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
