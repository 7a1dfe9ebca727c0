//! Route definitions for the `/various` resource.
//!
//! Unsupported methods answer with a JSON 405 instead of axum's empty one.

use axum::routing::{options, post};
use axum::Router;

use crate::handlers::{self, various};
use crate::state::AppState;

/// Routes mounted at `/various`.
///
/// ```text
/// POST    /invite-friend    -> invite_friend
/// OPTIONS /invite-friend    -> 200, empty body
/// OPTIONS /options          -> 200, empty body
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/invite-friend",
            post(various::invite_friend)
                .options(handlers::options)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/options",
            options(handlers::options).fallback(handlers::method_not_allowed),
        )
}
