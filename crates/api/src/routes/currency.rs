//! Route definitions for currency rates.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::currency;
use crate::state::AppState;

/// Routes mounted at `/currencies`.
///
/// ```text
/// GET /    -> list (?date, base)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(currency::list))
}

/// Routes mounted at `/admin/currencies`.
///
/// ```text
/// POST /refresh    -> refresh (?date)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/refresh", post(currency::refresh))
}
