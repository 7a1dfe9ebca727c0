//! Turns a provider payload into the rows to upsert for one day.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::provider::{parse_provider_nominal, parse_provider_value, DailyRates};
use super::RateUpsert;

/// Build the upserts for `date` from a provider payload.
///
/// Only entries whose code is in `active_codes` are kept. When nothing
/// survives the filter the plan is empty; otherwise the synthetic base row
/// (value = 1, nominal = 1) comes first, even if every surviving entry turns
/// out to be unparseable. A provider entry for the base code never replaces
/// the synthetic row.
pub fn plan_ingestion(
    date: NaiveDate,
    payload: &DailyRates,
    active_codes: &HashSet<String>,
    base_code: &str,
) -> Vec<RateUpsert> {
    let base = RateUpsert {
        date,
        char_code: base_code.to_string(),
        nominal: 1,
        value: 1.0,
    };
    let mut rows = vec![base];
    let mut any_active = false;

    for item in &payload.valute {
        let Some(code) = item.char_code.as_deref() else {
            continue;
        };
        if !active_codes.contains(code) {
            continue;
        }
        any_active = true;
        if code == base_code {
            continue;
        }
        let Some(raw_value) = item.value.as_ref() else {
            tracing::warn!(char_code = code, "Provider entry has no value, skipping");
            continue;
        };
        let parsed = parse_provider_value(raw_value)
            .and_then(|value| Ok((value, parse_provider_nominal(item.nominal.as_ref())?)));
        match parsed {
            Ok((value, nominal)) => rows.push(RateUpsert {
                date,
                char_code: code.to_string(),
                nominal,
                value,
            }),
            Err(e) => {
                tracing::warn!(char_code = code, error = %e, "Skipping malformed provider entry");
            }
        }
    }

    if !any_active {
        rows.clear();
    }
    rows
}
