//! Handlers for questionnaire forms.
//!
//! A user owns at most one form, reached through `/forms/me`. Admins may
//! read and edit any form by id.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use cabinet_core::error::CoreError;
use cabinet_core::form::presentation::{avatar_url, full_name};
use cabinet_core::form::{Form, FormProperty, FormTemplate, NATIVE_ATTRIBUTES, DEFAULT_TEMPLATE_ID};
use cabinet_core::invite::FieldError;
use cabinet_core::types::DbId;
use cabinet_db::repositories::{FormRepo, FormTemplateRepo};
use cabinet_db::PgFormValueStore;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Native columns a request body may write.
const WRITABLE_NATIVE: [&str; 1] = ["status"];

#[derive(Debug, Serialize)]
pub struct FormTemplateResponse {
    pub id: DbId,
    pub name: String,
    pub properties: Vec<FormProperty>,
    pub labels: BTreeMap<String, String>,
}

/// A form as returned to clients.
#[derive(Debug, Serialize)]
pub struct FormResponse {
    /// Every template property followed by the native columns.
    pub attributes: Map<String, Value>,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// GET /api/v1/form-template
pub async fn get_template(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<FormTemplateResponse>>> {
    let template = load_template(&state).await?;
    let form = template.create_form(None);

    Ok(Json(DataResponse {
        data: FormTemplateResponse {
            id: template.id,
            name: template.name.clone(),
            properties: template.properties().to_vec(),
            labels: form.labels(),
        },
    }))
}

/// GET /api/v1/forms/me
///
/// The caller's form, or a blank unsaved one when none exists yet.
pub async fn get_my_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<FormResponse>>> {
    let mut form = load_user_form(&state, user.user_id).await?;
    let data = render_form(&state, &mut form).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/forms/me
///
/// Create or update the caller's form from a JSON object of attributes.
pub async fn update_my_form(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<FormResponse>>> {
    let mut form = load_user_form(&state, user.user_id).await?;
    apply_and_save(&state, &user, &mut form, &input).await?;

    tracing::info!(user_id = user.user_id, form_id = ?form.id(), "Form updated");

    let data = render_form(&state, &mut form).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FormResponse>>> {
    let mut form = load_form_for(&state, &user, id).await?;
    let data = render_form(&state, &mut form).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/forms/{id}
pub async fn update_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<FormResponse>>> {
    let mut form = load_form_for(&state, &user, id).await?;
    apply_and_save(&state, &user, &mut form, &input).await?;

    tracing::info!(user_id = user.user_id, form_id = id, "Form updated");

    let data = render_form(&state, &mut form).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_template(state: &AppState) -> AppResult<Arc<FormTemplate>> {
    let template = FormTemplateRepo::load(&state.pool, DEFAULT_TEMPLATE_ID)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FormTemplate",
            id: DEFAULT_TEMPLATE_ID,
        })?;
    Ok(Arc::new(template))
}

/// The stored form of `user_id`, or a new one bound to the default template.
pub(crate) async fn load_user_form(state: &AppState, user_id: DbId) -> AppResult<Form> {
    let template = load_template(state).await?;
    match FormRepo::find_by_user(&state.pool, user_id).await? {
        Some(row) => Ok(Form::restore(template, row.into_record()?)?),
        None => Ok(template.create_form(Some(user_id))),
    }
}

/// Load a form by id, allowing only its owner or an admin.
async fn load_form_for(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Form> {
    let row = FormRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Form", id })?;

    if row.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Form belongs to another user".into(),
        )));
    }

    let template = load_template(state).await?;
    Ok(Form::restore(template, row.into_record()?)?)
}

/// Apply a request body, validate and save.
///
/// Only admins may move a form into a reviewer decision.
async fn apply_and_save(
    state: &AppState,
    user: &AuthUser,
    form: &mut Form,
    input: &Map<String, Value>,
) -> AppResult<()> {
    let store = PgFormValueStore::new(state.pool.clone());

    for name in input.keys() {
        let native = NATIVE_ATTRIBUTES.contains(&name.as_str()) && !form.has_property(name);
        if native && !WRITABLE_NATIVE.contains(&name.as_str()) {
            return Err(AppError::BadRequest(format!("{name} is read-only")));
        }
    }

    let previous = form.status();
    form.set_attributes(&store, input).await?;

    let status = form.status();
    if status != previous && status.is_review_decision() && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Only an admin can set status {status}"
        ))));
    }

    if !form.validate(&store, None).await? {
        let errors = form
            .errors()
            .into_iter()
            .flat_map(|(field, messages)| {
                messages
                    .into_iter()
                    .map(move |message| FieldError::new(field.clone(), message))
            })
            .collect();
        return Err(AppError::Unprocessable(errors));
    }

    FormRepo::save(&state.pool, form).await?;
    Ok(())
}

async fn render_form(state: &AppState, form: &mut Form) -> AppResult<FormResponse> {
    let store = PgFormValueStore::new(state.pool.clone());
    let attributes = form.attributes(&store, None).await?;
    let full_name = full_name(form, &store, None).await?;
    let avatar_url = avatar_url(form, &store, &state.config.avatar_base_url).await?;
    Ok(FormResponse {
        attributes,
        full_name,
        avatar_url,
    })
}
