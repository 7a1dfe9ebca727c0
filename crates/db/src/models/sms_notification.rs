//! Outbound SMS queue models.

use cabinet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Waiting for the sender.
pub const SMS_STATUS_QUEUED: &str = "queued";
pub const SMS_STATUS_SENT: &str = "sent";
pub const SMS_STATUS_FAILED: &str = "failed";

/// A row from the `sms_notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SmsNotification {
    pub id: DbId,
    pub recipient: String,
    pub body: String,
    pub status: String,
    pub user_id: Option<DbId>,
    pub event_id: Option<DbId>,
    pub scheduled_at: Timestamp,
    pub sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for queueing a message.
#[derive(Debug, Deserialize)]
pub struct CreateSmsNotification {
    pub recipient: String,
    pub body: String,
    pub user_id: Option<DbId>,
    pub event_id: Option<DbId>,
}
