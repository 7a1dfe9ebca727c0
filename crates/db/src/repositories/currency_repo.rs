//! Repository for the `currencies` table.

use cabinet_core::currency::RateUpsert;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};

use crate::models::currency::CurrencyRate;

/// Column list for `currencies` queries.
const COLUMNS: &str = "id, date, char_code, nominal, value, created_at, updated_at";

/// Same columns, qualified for joins.
const JOINED_COLUMNS: &str =
    "c.id, c.date, c.char_code, c.nominal, c.value, c.created_at, c.updated_at";

/// Provides rate storage keyed by `(date, char_code)`.
pub struct CurrencyRepo;

impl CurrencyRepo {
    /// Insert or overwrite the rate of one code on one day.
    pub async fn upsert(conn: &mut PgConnection, row: &RateUpsert) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO currencies (date, char_code, nominal, value) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (date, char_code) \
             DO UPDATE SET nominal = EXCLUDED.nominal, value = EXCLUDED.value",
        )
        .bind(row.date)
        .bind(&row.char_code)
        .bind(row.nominal)
        .bind(row.value)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Upsert every row in one transaction. Returns the number of rows written.
    pub async fn upsert_all(pool: &PgPool, rows: &[RateUpsert]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for row in rows {
            Self::upsert(&mut *tx, row).await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    /// Rates of active codes on `date`, ordered by code.
    pub async fn list_active_for_date(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<CurrencyRate>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM currencies c \
             JOIN currency_codes cc ON cc.char_code = c.char_code AND cc.is_active = true \
             WHERE c.date = $1 \
             ORDER BY c.char_code"
        );
        sqlx::query_as::<_, CurrencyRate>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Rate of one code on one day, active or not.
    pub async fn find(
        pool: &PgPool,
        date: NaiveDate,
        char_code: &str,
    ) -> Result<Option<CurrencyRate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM currencies WHERE date = $1 AND char_code = $2");
        sqlx::query_as::<_, CurrencyRate>(&query)
            .bind(date)
            .bind(char_code)
            .fetch_optional(pool)
            .await
    }

    /// Number of stored rates on `date`.
    pub async fn count_for_date(pool: &PgPool, date: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM currencies WHERE date = $1")
            .bind(date)
            .fetch_one(pool)
            .await
    }
}
