//! Currency rate and currency code models.

use cabinet_core::currency::RateQuote;
use cabinet_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `currencies` table: one code's rate on one day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CurrencyRate {
    pub id: DbId,
    pub date: NaiveDate,
    pub char_code: String,
    pub nominal: i32,
    pub value: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CurrencyRate {
    pub fn to_quote(&self) -> RateQuote {
        RateQuote {
            char_code: self.char_code.clone(),
            nominal: self.nominal,
            value: self.value,
        }
    }
}

/// A row from the `currency_codes` table. Only active codes are ingested
/// and listed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CurrencyCode {
    pub id: DbId,
    pub char_code: String,
    pub name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
