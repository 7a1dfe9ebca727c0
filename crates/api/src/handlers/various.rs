//! Miscellaneous actions of the personal cabinet.

use axum::extract::State;
use axum::Json;
use cabinet_core::form::presentation::full_name;
use cabinet_core::invite::{compose_invitation_body, validate_invitation};
use cabinet_core::types::DbId;
use cabinet_db::models::sms_notification::CreateSmsNotification;
use cabinet_db::repositories::{EventRepo, SmsNotificationRepo};
use cabinet_db::PgFormValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form::load_user_form;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `POST /various/invite-friend`.
///
/// `event_id` is accepted as a number or a numeric string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InviteFriendRequest {
    pub event_id: Option<Value>,
    pub phone: Option<String>,
}

impl InviteFriendRequest {
    fn event_id(&self) -> Option<DbId> {
        match self.event_id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InviteFriendResponse {
    pub request: bool,
}

/// POST /api/v1/various/invite-friend
///
/// Queue an SMS inviting a friend to an event that is still open.
pub async fn invite_friend(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<InviteFriendRequest>,
) -> AppResult<Json<InviteFriendResponse>> {
    let event = match input.event_id() {
        Some(id) => EventRepo::find_by_id(&state.pool, id).await?,
        None => None,
    };
    let event_status = event.as_ref().and_then(|e| e.status().ok());

    let phone = validate_invitation(event_status, input.phone.as_deref())
        .map_err(AppError::Unprocessable)?;
    let event = event.ok_or_else(|| {
        AppError::InternalError("Invitation validated without an event".into())
    })?;

    let inviter = inviter_name(&state, user.user_id).await?;
    let body = compose_invitation_body(&inviter, &event.header);

    let sms = SmsNotificationRepo::enqueue(
        &state.pool,
        &CreateSmsNotification {
            recipient: phone,
            body,
            user_id: Some(user.user_id),
            event_id: Some(event.id),
        },
    )
    .await?;

    tracing::info!(
        user_id = user.user_id,
        event_id = event.id,
        sms_id = sms.id,
        "Friend invitation queued"
    );

    Ok(Json(InviteFriendResponse { request: true }))
}

/// Full name from the inviter's form; empty when they have not filled it in.
async fn inviter_name(state: &AppState, user_id: DbId) -> AppResult<String> {
    let mut form = load_user_form(state, user_id).await?;
    let store = PgFormValueStore::new(state.pool.clone());
    Ok(full_name(&mut form, &store, None).await?)
}
