//! Rules for inviting a friend to an event by SMS.
//!
//! Only events that are still open to participants accept invitations. The
//! phone number is normalised to its digits; the notification body names
//! the inviter and the event.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Lifecycle of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    New,
    Active,
    Finished,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether friends may still be invited.
    pub fn accepts_invitations(self) -> bool {
        matches!(self, Self::New | Self::Active)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!("Unknown event status: {other}"))),
        }
    }
}

/// One failed field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Strip formatting from a phone number. `None` unless the result has a
/// plausible number of digits.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')');
    if trimmed.is_empty() || !trimmed.chars().all(allowed) {
        return None;
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS)
        .contains(&digits.len())
        .then_some(digits)
}

/// Check the event and phone of an invitation. Returns the normalised phone
/// or every field error found.
pub fn validate_invitation(
    event_status: Option<EventStatus>,
    phone: Option<&str>,
) -> Result<String, Vec<FieldError>> {
    let mut errors = Vec::new();

    if !event_status.is_some_and(EventStatus::accepts_invitations) {
        errors.push(FieldError::new("event_id", "Event id is invalid."));
    }

    let phone = match phone {
        None => {
            errors.push(FieldError::new("phone", "Phone cannot be blank."));
            None
        }
        Some(raw) if raw.trim().is_empty() => {
            errors.push(FieldError::new("phone", "Phone cannot be blank."));
            None
        }
        Some(raw) => {
            let normalized = normalize_phone(raw);
            if normalized.is_none() {
                errors.push(FieldError::new("phone", "Phone is invalid."));
            }
            normalized
        }
    };

    match phone {
        Some(phone) if errors.is_empty() => Ok(phone),
        _ => Err(errors),
    }
}

/// Text of the invitation SMS.
pub fn compose_invitation_body(inviter_name: &str, event_header: &str) -> String {
    let inviter = inviter_name.trim();
    if inviter.is_empty() {
        format!("You are invited to \"{event_header}\". Join us!")
    } else {
        format!("{inviter} invites you to \"{event_header}\". Join us!")
    }
}
