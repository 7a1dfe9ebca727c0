//! Payload types returned by the daily exchange-rate provider.
//!
//! The provider publishes a `Valute` collection whose entries carry
//! `CharCode`, `Nominal` and a comma-decimal `Value`. Depending on the feed
//! flavour `Valute` is either a list or an object keyed by code, and numeric
//! fields may arrive as strings or numbers; both shapes are accepted.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::CoreError;

/// Daily rate list as published by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyRates {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Valute", default, deserialize_with = "deserialize_valute")]
    pub valute: Vec<Valute>,
}

/// One currency entry of the provider payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Valute {
    #[serde(rename = "CharCode", default)]
    pub char_code: Option<String>,
    #[serde(rename = "Nominal", default)]
    pub nominal: Option<NumberOrText>,
    #[serde(rename = "Value", default)]
    pub value: Option<NumberOrText>,
}

/// A numeric field that may be encoded as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValuteCollection {
    List(Vec<Valute>),
    ByCode(BTreeMap<String, Valute>),
}

fn deserialize_valute<'de, D>(deserializer: D) -> Result<Vec<Valute>, D::Error>
where
    D: Deserializer<'de>,
{
    let collection = Option::<ValuteCollection>::deserialize(deserializer)?;
    Ok(match collection {
        None => Vec::new(),
        Some(ValuteCollection::List(items)) => items,
        Some(ValuteCollection::ByCode(map)) => map
            .into_iter()
            .map(|(code, mut item)| {
                if item.char_code.is_none() {
                    item.char_code = Some(code);
                }
                item
            })
            .collect(),
    })
}

/// Parse a provider decimal such as `"92,5101"` (comma or dot separator).
pub fn parse_provider_value(raw: &NumberOrText) -> Result<f64, CoreError> {
    let value = match raw {
        NumberOrText::Number(n) => *n,
        NumberOrText::Text(text) => {
            let normalized: String = text
                .trim()
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            normalized.parse::<f64>().map_err(|_| {
                CoreError::Validation(format!("Invalid provider value: {text:?}"))
            })?
        }
    };
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "Invalid provider value: {raw:?}"
        )));
    }
    Ok(value)
}

/// Parse a provider nominal. A missing nominal means one unit.
pub fn parse_provider_nominal(raw: Option<&NumberOrText>) -> Result<i32, CoreError> {
    let nominal = match raw {
        None => return Ok(1),
        Some(NumberOrText::Number(n)) if n.fract() == 0.0 && *n >= 1.0 && *n <= f64::from(i32::MAX) => {
            *n as i32
        }
        Some(NumberOrText::Text(text)) => text.trim().parse::<i32>().map_err(|_| {
            CoreError::Validation(format!("Invalid provider nominal: {text:?}"))
        })?,
        Some(other) => {
            return Err(CoreError::Validation(format!(
                "Invalid provider nominal: {other:?}"
            )))
        }
    };
    if nominal < 1 {
        return Err(CoreError::Validation(format!(
            "Provider nominal must be positive, got {nominal}"
        )));
    }
    Ok(nominal)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn comma_decimal_is_parsed() {
        let raw = NumberOrText::Text("92,5101".into());
        assert_eq!(parse_provider_value(&raw).unwrap(), 92.5101);
    }

    #[test]
    fn dot_decimal_and_numbers_are_parsed() {
        assert_eq!(
            parse_provider_value(&NumberOrText::Text(" 1.5 ".into())).unwrap(),
            1.5
        );
        assert_eq!(
            parse_provider_value(&NumberOrText::Number(61.25)).unwrap(),
            61.25
        );
    }

    #[test]
    fn garbage_value_is_rejected() {
        let raw = NumberOrText::Text("n/a".into());
        assert_matches!(parse_provider_value(&raw), Err(CoreError::Validation(_)));
    }

    #[test]
    fn nominal_accepts_numbers_and_strings() {
        assert_eq!(parse_provider_nominal(None).unwrap(), 1);
        assert_eq!(
            parse_provider_nominal(Some(&NumberOrText::Number(100.0))).unwrap(),
            100
        );
        assert_eq!(
            parse_provider_nominal(Some(&NumberOrText::Text("10".into()))).unwrap(),
            10
        );
        assert_matches!(
            parse_provider_nominal(Some(&NumberOrText::Number(0.5))),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            parse_provider_nominal(Some(&NumberOrText::Text("0".into()))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn valute_list_shape_is_accepted() {
        let json = r#"{"Valute": [{"CharCode": "USD", "Nominal": "1", "Value": "92,5101"}]}"#;
        let rates: DailyRates = serde_json::from_str(json).unwrap();
        assert_eq!(rates.valute.len(), 1);
        assert_eq!(rates.valute[0].char_code.as_deref(), Some("USD"));
    }

    #[test]
    fn valute_map_shape_fills_missing_codes_from_keys() {
        let json = r#"{
            "Date": "2024-03-02T11:30:00+03:00",
            "Valute": {
                "EUR": {"CharCode": "EUR", "Nominal": 1, "Value": 100.12},
                "JPY": {"Nominal": 100, "Value": 61.5}
            }
        }"#;
        let rates: DailyRates = serde_json::from_str(json).unwrap();
        let codes: Vec<_> = rates
            .valute
            .iter()
            .map(|v| v.char_code.clone().unwrap())
            .collect();
        assert_eq!(codes, vec!["EUR", "JPY"]);
        assert_eq!(rates.date.as_deref(), Some("2024-03-02T11:30:00+03:00"));
    }

    #[test]
    fn missing_valute_yields_empty_list() {
        let rates: DailyRates = serde_json::from_str("{}").unwrap();
        assert!(rates.valute.is_empty());
    }
}
