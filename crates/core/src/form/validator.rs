//! Data-driven property validators.
//!
//! Each row of `property_validators` stores a `class` and a JSON `params`
//! object. They are decoded into [`ValidatorRule`], a tagged enum, and
//! evaluated against the text value of a form property. Pure logic, no
//! database access.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ::validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::DbId;

/// Date format used by the `date` rule when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A `match` rule pattern, compiled when the rule is decoded.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// A single validation rule, tagged by its `class`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", content = "params", rename_all = "snake_case")]
pub enum ValidatorRule {
    Required {
        #[serde(default)]
        message: Option<String>,
    },
    String {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        message: Option<String>,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
        #[serde(default)]
        integer_only: bool,
        #[serde(default)]
        message: Option<String>,
    },
    Match {
        pattern: Pattern,
        #[serde(default)]
        message: Option<String>,
    },
    Email {
        #[serde(default)]
        message: Option<String>,
    },
    In {
        range: Vec<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Date {
        #[serde(default)]
        format: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl ValidatorRule {
    /// Decode a rule from its stored `class` name and `params` object.
    ///
    /// `null` params are treated as an empty object. Unknown classes,
    /// malformed params and patterns that do not compile are reported as
    /// [`CoreError::Validation`].
    pub fn from_parts(class: &str, params: &serde_json::Value) -> Result<Self, CoreError> {
        let params = if params.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            params.clone()
        };
        let tagged = serde_json::json!({ "class": class, "params": params });
        serde_json::from_value(tagged).map_err(|e| {
            CoreError::Validation(format!("Invalid validator '{class}': {e}"))
        })
    }

    /// The stored class name of this rule.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Required { .. } => "required",
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Match { .. } => "match",
            Self::Email { .. } => "email",
            Self::In { .. } => "in",
            Self::Date { .. } => "date",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required { .. })
    }

    /// Check `value` against the rule. Returns the error message on failure.
    ///
    /// Every rule except `required` passes on an empty value.
    pub fn check(&self, value: Option<&str>, label: &str) -> Option<String> {
        if let Self::Required { message } = self {
            let blank = value.map_or(true, |v| v.trim().is_empty());
            return blank.then(|| render(message, "{attribute} cannot be blank.", label, &[]));
        }

        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return None,
        };

        match self {
            Self::Required { .. } => None,
            Self::String { min, max, message } => {
                let len = value.chars().count();
                if let Some(min) = min.filter(|min| len < *min) {
                    return Some(render(
                        message,
                        "{attribute} should contain at least {min} characters.",
                        label,
                        &[("min", min.to_string())],
                    ));
                }
                if let Some(max) = max.filter(|max| len > *max) {
                    return Some(render(
                        message,
                        "{attribute} should contain at most {max} characters.",
                        label,
                        &[("max", max.to_string())],
                    ));
                }
                None
            }
            Self::Number {
                min,
                max,
                integer_only,
                message,
            } => check_number(value, *min, *max, *integer_only, message, label),
            Self::Match { pattern, message } => (!pattern.is_match(value))
                .then(|| render(message, "{attribute} is invalid.", label, &[])),
            Self::Email { message } => (!value.validate_email()).then(|| {
                render(message, "{attribute} is not a valid email address.", label, &[])
            }),
            Self::In { range, message } => (!range.iter().any(|allowed| allowed == value))
                .then(|| render(message, "{attribute} is invalid.", label, &[])),
            Self::Date { format, message } => {
                let format = format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
                NaiveDate::parse_from_str(value, format).err().map(|_| {
                    render(message, "The format of {attribute} is invalid.", label, &[])
                })
            }
        }
    }
}

fn check_number(
    value: &str,
    min: Option<f64>,
    max: Option<f64>,
    integer_only: bool,
    message: &Option<String>,
    label: &str,
) -> Option<String> {
    let trimmed = value.trim();
    if integer_only {
        let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Some(render(message, "{attribute} must be an integer.", label, &[]));
        }
    }
    let Ok(number) = trimmed.parse::<f64>() else {
        return Some(render(message, "{attribute} must be a number.", label, &[]));
    };
    if !number.is_finite() {
        return Some(render(message, "{attribute} must be a number.", label, &[]));
    }
    if let Some(min) = min.filter(|min| number < *min) {
        return Some(render(
            message,
            "{attribute} must be no less than {min}.",
            label,
            &[("min", min.to_string())],
        ));
    }
    if let Some(max) = max.filter(|max| number > *max) {
        return Some(render(
            message,
            "{attribute} must be no greater than {max}.",
            label,
            &[("max", max.to_string())],
        ));
    }
    None
}

/// Substitute `{attribute}` and named params into the custom or default message.
fn render(custom: &Option<String>, default: &str, label: &str, params: &[(&str, String)]) -> String {
    let mut text = custom.as_deref().unwrap_or(default).replace("{attribute}", label);
    for (name, value) in params {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

/// A validator row attached to a form property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValidator {
    pub id: DbId,
    pub property_id: DbId,
    pub title: Option<String>,
    /// Lower runs first.
    pub priority: i32,
    pub rule: ValidatorRule,
}

/// Run every validator in priority order and collect all messages.
pub fn run_validators(
    validators: &[PropertyValidator],
    value: Option<&str>,
    label: &str,
) -> Vec<String> {
    let mut ordered: Vec<&PropertyValidator> = validators.iter().collect();
    ordered.sort_by_key(|v| (v.priority, v.id));
    ordered
        .into_iter()
        .filter_map(|v| v.rule.check(value, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn rule(class: &str, params: serde_json::Value) -> ValidatorRule {
        ValidatorRule::from_parts(class, &params).unwrap()
    }

    #[test]
    fn required_rejects_missing_blank_and_whitespace() {
        let r = rule("required", json!({"skipOnError": false}));
        assert_eq!(r.check(None, "Last name").as_deref(), Some("Last name cannot be blank."));
        assert!(r.check(Some(""), "Last name").is_some());
        assert!(r.check(Some("   "), "Last name").is_some());
        assert!(r.check(Some("Smith"), "Last name").is_none());
    }

    #[test]
    fn null_params_decode_to_defaults() {
        assert_eq!(
            ValidatorRule::from_parts("email", &serde_json::Value::Null).unwrap(),
            ValidatorRule::Email { message: None }
        );
    }

    #[test]
    fn unknown_class_is_rejected() {
        assert_matches!(
            ValidatorRule::from_parts("captcha", &json!({})),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn non_required_rules_skip_empty_values() {
        let r = rule("string", json!({"min": 3}));
        assert!(r.check(None, "Name").is_none());
        assert!(r.check(Some(""), "Name").is_none());
    }

    #[test]
    fn string_length_counts_characters() {
        let r = rule("string", json!({"min": 2, "max": 4}));
        assert!(r.check(Some("Яна"), "Name").is_none());
        assert_eq!(
            r.check(Some("a"), "Name").as_deref(),
            Some("Name should contain at least 2 characters.")
        );
        assert_eq!(
            r.check(Some("abcde"), "Name").as_deref(),
            Some("Name should contain at most 4 characters.")
        );
    }

    #[test]
    fn number_bounds_and_integer_only() {
        let r = rule("number", json!({"min": 18, "max": 99, "integer_only": true}));
        assert!(r.check(Some("42"), "Age").is_none());
        assert_eq!(r.check(Some("4.5"), "Age").as_deref(), Some("Age must be an integer."));
        assert_eq!(r.check(Some("abc"), "Age").as_deref(), Some("Age must be an integer."));
        assert_eq!(r.check(Some("17"), "Age").as_deref(), Some("Age must be no less than 18."));
        assert_eq!(
            r.check(Some("100"), "Age").as_deref(),
            Some("Age must be no greater than 99.")
        );

        let float = rule("number", json!({}));
        assert!(float.check(Some("4.5"), "Height").is_none());
        assert_eq!(
            float.check(Some("tall"), "Height").as_deref(),
            Some("Height must be a number.")
        );
    }

    #[test]
    fn match_email_in_and_date() {
        let phone = rule("match", json!({"pattern": "^7\\d{10}$"}));
        assert!(phone.check(Some("79046652277"), "Phone").is_none());
        assert_eq!(phone.check(Some("123"), "Phone").as_deref(), Some("Phone is invalid."));

        let email = rule("email", json!({}));
        assert!(email.check(Some("user@example.com"), "Email").is_none());
        assert!(email.check(Some("not-an-email"), "Email").is_some());

        let gender = rule("in", json!({"range": ["m", "f"]}));
        assert!(gender.check(Some("f"), "Gender").is_none());
        assert!(gender.check(Some("x"), "Gender").is_some());

        let birthday = rule("date", json!({}));
        assert!(birthday.check(Some("1990-05-17"), "Birthday").is_none());
        assert_eq!(
            birthday.check(Some("17.05.1990"), "Birthday").as_deref(),
            Some("The format of Birthday is invalid.")
        );
    }

    #[test]
    fn invalid_pattern_is_rejected_on_decode() {
        assert_matches!(
            ValidatorRule::from_parts("match", &json!({"pattern": "(unclosed"})),
            Err(CoreError::Validation(message)) if message.contains("match")
        );
    }

    #[test]
    fn pattern_serializes_as_its_source() {
        let r = rule("match", json!({"pattern": "^\\d+$"}));
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"class": "match", "params": {"pattern": "^\\d+$", "message": null}})
        );
    }

    #[test]
    fn custom_message_overrides_default() {
        let r = rule("required", json!({"message": "Please fill in {attribute}"}));
        assert_eq!(r.check(None, "City").as_deref(), Some("Please fill in City"));
    }

    #[test]
    fn run_validators_orders_by_priority_and_collects_all() {
        let validators = vec![
            PropertyValidator {
                id: 2,
                property_id: 1,
                title: None,
                priority: 2,
                rule: rule("required", json!({"message": "second"})),
            },
            PropertyValidator {
                id: 1,
                property_id: 1,
                title: None,
                priority: 1,
                rule: rule("required", json!({"message": "first"})),
            },
        ];
        assert_eq!(run_validators(&validators, Some(""), "X"), vec!["first", "second"]);
        assert!(run_validators(&validators, Some("ok"), "X").is_empty());
    }
}
