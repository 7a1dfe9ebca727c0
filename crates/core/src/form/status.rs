//! Form workflow status and its allowed transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
    Archived,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }

    /// Statuses a new form may be created in.
    pub fn is_initial(self) -> bool {
        matches!(self, Self::Draft | Self::Submitted)
    }

    /// Reviewer decisions; only admins may move a form into them.
    pub fn is_review_decision(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Archived)
    }

    /// Whether a saved form in `self` may move to `next`. Staying put is
    /// always allowed.
    pub fn can_transition_to(self, next: FormStatus) -> bool {
        use FormStatus::*;
        self == next
            || matches!(
                (self, next),
                (Draft, Submitted)
                    | (Submitted, Approved)
                    | (Submitted, Rejected)
                    | (Rejected, Submitted)
                    | (Approved, Archived)
                    | (Rejected, Archived)
            )
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!("Unknown form status: {other}"))),
        }
    }
}
