//! Base-relative and day-over-day rate diffs.
//!
//! Pure two-map join over same-day and prior-day quotes; missing data yields
//! `None` rather than an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::RateQuote;

/// Decimal places kept for the base-relative ratio.
pub const DIFF_BASE_PRECISION: i32 = 5;

/// Decimal places kept for the day-over-day delta.
pub const DIFF_YESTERDAY_PRECISION: i32 = 4;

/// A currency rate as presented to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRateView {
    pub char_code: String,
    pub date: NaiveDate,
    pub nominal: i32,
    pub value: f64,
    pub diff_base: Option<f64>,
    pub diff_yesterday: Option<f64>,
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Ratio of the item's per-unit value to the base currency's per-unit value.
///
/// `None` when either quote is missing or a denominator is zero.
pub fn diff_base(item: Option<&RateQuote>, base: Option<&RateQuote>) -> Option<f64> {
    let (item, base) = (item?, base?);
    let denominator = base.value * f64::from(item.nominal);
    if denominator == 0.0 {
        return None;
    }
    let ratio = (item.value * f64::from(base.nominal)) / denominator;
    Some(round_to(ratio, DIFF_BASE_PRECISION))
}

/// Absolute change of the quoted value since the previous day.
pub fn diff_yesterday(item: Option<&RateQuote>, previous: Option<&RateQuote>) -> Option<f64> {
    let (item, previous) = (item?, previous?);
    Some(round_to(item.value - previous.value, DIFF_YESTERDAY_PRECISION))
}

/// Join the quotes of `date` with those of the previous day.
///
/// One entry per currency quoted on `date`, ordered by code. When
/// `base_code` has no quote on `date`, every `diff_base` is `None`.
pub fn build_rate_list(
    date: NaiveDate,
    current: &[RateQuote],
    previous: &[RateQuote],
    base_code: &str,
) -> Vec<CurrencyRateView> {
    let current: BTreeMap<&str, &RateQuote> =
        current.iter().map(|q| (q.char_code.as_str(), q)).collect();
    let previous: BTreeMap<&str, &RateQuote> =
        previous.iter().map(|q| (q.char_code.as_str(), q)).collect();
    let base = current.get(base_code).copied();

    current
        .iter()
        .map(|(code, item)| CurrencyRateView {
            char_code: (*code).to_string(),
            date,
            nominal: item.nominal,
            value: item.value,
            diff_base: diff_base(Some(*item), base),
            diff_yesterday: diff_yesterday(Some(*item), previous.get(code).copied()),
        })
        .collect()
}
