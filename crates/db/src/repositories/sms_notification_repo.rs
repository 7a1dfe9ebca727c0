//! Repository for the `sms_notifications` outbox.

use cabinet_core::types::DbId;
use sqlx::PgPool;

use crate::models::sms_notification::{
    CreateSmsNotification, SmsNotification, SMS_STATUS_QUEUED, SMS_STATUS_SENT,
};

const COLUMNS: &str = "id, recipient, body, status, user_id, event_id, scheduled_at, sent_at, \
    created_at, updated_at";

/// Queue operations for outbound SMS. Delivery itself happens elsewhere.
pub struct SmsNotificationRepo;

impl SmsNotificationRepo {
    /// Queue a message for immediate delivery.
    pub async fn enqueue(
        pool: &PgPool,
        input: &CreateSmsNotification,
    ) -> Result<SmsNotification, sqlx::Error> {
        let query = format!(
            "INSERT INTO sms_notifications (recipient, body, status, user_id, event_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SmsNotification>(&query)
            .bind(&input.recipient)
            .bind(&input.body)
            .bind(SMS_STATUS_QUEUED)
            .bind(input.user_id)
            .bind(input.event_id)
            .fetch_one(pool)
            .await
    }

    /// Queued messages, oldest schedule first.
    pub async fn list_queued(pool: &PgPool, limit: i64) -> Result<Vec<SmsNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sms_notifications \
             WHERE status = $1 \
             ORDER BY scheduled_at, id \
             LIMIT $2"
        );
        sqlx::query_as::<_, SmsNotification>(&query)
            .bind(SMS_STATUS_QUEUED)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn count_queued(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sms_notifications WHERE status = $1")
            .bind(SMS_STATUS_QUEUED)
            .fetch_one(pool)
            .await
    }

    /// Mark a queued message as delivered. Returns `false` if it was not queued.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sms_notifications SET status = $2, sent_at = NOW() \
             WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(SMS_STATUS_SENT)
        .bind(SMS_STATUS_QUEUED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
