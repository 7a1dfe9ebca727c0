pub mod auth;
pub mod currency;
pub mod form;
pub mod various;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Method fallback for routes: 405 with the usual JSON error body.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method not allowed",
            "code": "METHOD_NOT_ALLOWED",
        })),
    )
        .into_response()
}

/// Answer a bare `OPTIONS` request: 200 with an empty body.
pub async fn options() -> StatusCode {
    StatusCode::OK
}
