//! Repository for the `currency_codes` table.

use sqlx::PgPool;

use crate::models::currency::CurrencyCode;

const COLUMNS: &str = "id, char_code, name, is_active, created_at, updated_at";

pub struct CurrencyCodeRepo;

impl CurrencyCodeRepo {
    /// All codes, ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<CurrencyCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM currency_codes ORDER BY char_code");
        sqlx::query_as::<_, CurrencyCode>(&query).fetch_all(pool).await
    }

    /// Codes of the active currencies.
    pub async fn list_active_codes(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT char_code FROM currency_codes WHERE is_active = true ORDER BY char_code",
        )
        .fetch_all(pool)
        .await
    }

    /// Turn a code on or off. Returns `false` if the code is unknown.
    pub async fn set_active(
        pool: &PgPool,
        char_code: &str,
        is_active: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE currency_codes SET is_active = $2 WHERE char_code = $1")
            .bind(char_code)
            .bind(is_active)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
