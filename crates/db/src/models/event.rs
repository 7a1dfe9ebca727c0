//! Event entity model and DTOs.

use cabinet_core::error::CoreError;
use cabinet_core::invite::EventStatus;
use cabinet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub header: String,
    pub status: String,
    pub starts_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn status(&self) -> Result<EventStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for creating a new event.
#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub header: String,
    pub status: EventStatus,
    pub starts_at: Option<Timestamp>,
}
