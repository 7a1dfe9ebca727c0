//! Route definitions for the `/forms` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::form;
use crate::state::AppState;

/// Routes mounted at `/forms`.
///
/// ```text
/// GET /me      -> get_my_form
/// PUT /me      -> update_my_form
/// GET /{id}    -> get_form
/// PUT /{id}    -> update_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(form::get_my_form).put(form::update_my_form))
        .route("/{id}", get(form::get_form).put(form::update_form))
}
