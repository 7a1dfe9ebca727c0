//! Integration tests for events and the SMS outbox.

use cabinet_core::invite::EventStatus;
use cabinet_db::models::event::CreateEvent;
use cabinet_db::models::sms_notification::{CreateSmsNotification, SMS_STATUS_QUEUED};
use cabinet_db::repositories::{EventRepo, SmsNotificationRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_status_round_trips(pool: PgPool) {
    let event = EventRepo::create(
        &pool,
        &CreateEvent {
            header: "Spring run".to_string(),
            status: EventStatus::Active,
            starts_at: None,
        },
    )
    .await
    .unwrap();

    let found = EventRepo::find_by_id(&pool, event.id).await.unwrap().unwrap();
    assert_eq!(found.status().unwrap(), EventStatus::Active);
    assert!(EventRepo::find_by_id(&pool, event.id + 1).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn queued_messages_drain_in_order(pool: PgPool) {
    for recipient in ["79046652277", "79046652278"] {
        SmsNotificationRepo::enqueue(
            &pool,
            &CreateSmsNotification {
                recipient: recipient.to_string(),
                body: "Join us".to_string(),
                user_id: None,
                event_id: None,
            },
        )
        .await
        .unwrap();
    }

    let queued = SmsNotificationRepo::list_queued(&pool, 10).await.unwrap();
    assert_eq!(queued.len(), 2);
    assert!(queued.iter().all(|sms| sms.status == SMS_STATUS_QUEUED));
    assert_eq!(queued[0].recipient, "79046652277");

    assert!(SmsNotificationRepo::mark_sent(&pool, queued[0].id).await.unwrap());
    assert!(!SmsNotificationRepo::mark_sent(&pool, queued[0].id).await.unwrap());
    assert_eq!(SmsNotificationRepo::count_queued(&pool).await.unwrap(), 1);
}
