//! Currency exchange rates: diff computation, provider payloads, and
//! ingestion planning.

pub mod diff;
pub mod ingest;
pub mod provider;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference currency. Its rate is always stored as value = 1, nominal = 1.
pub const DEFAULT_BASE: &str = "RUB";

/// Format used by the provider for the `date_req` query parameter.
pub const PROVIDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// One currency's rate on a given day: `nominal` units cost `value` of the
/// base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub char_code: String,
    pub nominal: i32,
    pub value: f64,
}

/// A row to be written by the ingestion step, keyed by `(date, char_code)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateUpsert {
    pub date: NaiveDate,
    pub char_code: String,
    pub nominal: i32,
    pub value: f64,
}
