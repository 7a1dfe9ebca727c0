//! Fetch one day of rates, keep the active currencies, and upsert them.

use std::collections::HashSet;
use std::sync::Arc;

use cabinet_core::currency::ingest::plan_ingestion;
use cabinet_db::repositories::{CurrencyCodeRepo, CurrencyRepo};
use cabinet_db::DbPool;
use chrono::NaiveDate;

use super::RateProvider;
use crate::error::AppResult;

/// Runs ingestion for a date. Rerunning a date overwrites its rows.
pub struct RateIngestor {
    pool: DbPool,
    provider: Arc<dyn RateProvider>,
    base_code: String,
}

impl RateIngestor {
    pub fn new(pool: DbPool, provider: Arc<dyn RateProvider>, base_code: String) -> Self {
        Self {
            pool,
            provider,
            base_code,
        }
    }

    /// Ingest the rates of `date`. Returns the number of rows written; zero
    /// when no active currency was present in the payload.
    pub async fn update(&self, date: NaiveDate) -> AppResult<u64> {
        tracing::debug!(%date, "Updating currency rates");

        let payload = self.provider.daily_rates(date).await?;

        let active: HashSet<String> = CurrencyCodeRepo::list_active_codes(&self.pool)
            .await?
            .into_iter()
            .collect();

        let plan = plan_ingestion(date, &payload, &active, &self.base_code);
        tracing::debug!(%date, received = payload.valute.len(), planned = plan.len(), "Filtered rates");

        if plan.is_empty() {
            tracing::info!(%date, "No active currencies in provider payload");
            return Ok(0);
        }

        let written = CurrencyRepo::upsert_all(&self.pool, &plan).await?;
        tracing::info!(%date, written, "Currency rates updated");
        Ok(written)
    }
}
