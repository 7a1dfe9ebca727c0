//! Handlers for currency rates.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use cabinet_core::currency::diff::{build_rate_list, CurrencyRateView};
use cabinet_core::currency::RateQuote;
use cabinet_db::repositories::CurrencyRepo;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::rates::RateIngestor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /currencies`.
#[derive(Debug, Deserialize)]
pub struct CurrencyListParams {
    /// Day to list (default: today, UTC).
    pub date: Option<NaiveDate>,
    /// Reference currency for `diffBase` (default: the configured base).
    pub base: Option<String>,
}

/// Query parameters for `POST /admin/currencies/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResult {
    pub date: NaiveDate,
    pub rows_written: u64,
}

/// GET /api/v1/currencies
///
/// Active rates of the day with their diff to the base currency and to
/// the previous day.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CurrencyListParams>,
) -> AppResult<Json<DataResponse<Vec<CurrencyRateView>>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let base = params
        .base
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| state.config.rates.base_currency.clone());
    let previous_day = date
        .pred_opt()
        .ok_or_else(|| AppError::BadRequest(format!("No day before {date}")))?;

    let current: Vec<RateQuote> = CurrencyRepo::list_active_for_date(&state.pool, date)
        .await?
        .iter()
        .map(|rate| rate.to_quote())
        .collect();
    let previous: Vec<RateQuote> = CurrencyRepo::list_active_for_date(&state.pool, previous_day)
        .await?
        .iter()
        .map(|rate| rate.to_quote())
        .collect();

    Ok(Json(DataResponse {
        data: build_rate_list(date, &current, &previous, &base),
    }))
}

/// POST /api/v1/admin/currencies/refresh
///
/// Ingest the provider's rates for a day (default: today).
pub async fn refresh(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<RefreshParams>,
) -> AppResult<Json<DataResponse<RefreshResult>>> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let ingestor = RateIngestor::new(
        state.pool.clone(),
        Arc::clone(&state.rate_provider),
        state.config.rates.base_currency.clone(),
    );
    let rows_written = ingestor.update(date).await?;

    tracing::info!(user_id = admin.user_id, %date, rows_written, "Manual rate refresh");

    Ok(Json(DataResponse {
        data: RefreshResult { date, rows_written },
    }))
}
