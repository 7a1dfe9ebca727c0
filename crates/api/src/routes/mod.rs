pub mod auth;
pub mod currency;
pub mod form;
pub mod health;
pub mod various;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
///
/// /currencies                          rates of a day with diffs (GET)
/// /admin/currencies/refresh            ingest provider rates (POST, admin only)
///
/// /form-template                       properties and labels (GET)
/// /forms/me                            get, create or update own form
/// /forms/{id}                          get, update (owner or admin)
///
/// /various/invite-friend               queue an invitation SMS (POST)
/// /various/options                     preflight probe (OPTIONS)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication.
        .nest("/auth", auth::router())
        // Exchange rates.
        .nest("/currencies", currency::router())
        .nest("/admin/currencies", currency::admin_router())
        // Questionnaire template and forms.
        .route("/form-template", get(handlers::form::get_template))
        .nest("/forms", form::router())
        // Invitations and other cabinet actions.
        .nest("/various", various::router())
}
