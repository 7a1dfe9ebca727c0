//! Success envelope shared by handlers.

use serde::Serialize;

/// `{ "data": T }`. Error bodies use a different shape, see
/// [`AppError`](crate::error::AppError).
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
