//! HTTP client for the daily exchange-rate provider.
//!
//! The provider answers `GET {url}?date_req=DD/MM/YYYY` with a JSON
//! document whose `Valute` member lists the rates of that day.

use async_trait::async_trait;
use cabinet_core::currency::provider::DailyRates;
use cabinet_core::currency::PROVIDER_DATE_FORMAT;
use chrono::NaiveDate;

/// Errors from the rate provider layer.
#[derive(Debug, thiserror::Error)]
pub enum RateProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Rate provider error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Source of one day's exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn daily_rates(&self, date: NaiveDate) -> Result<DailyRates, RateProviderError>;
}

/// [`RateProvider`] backed by the central bank's JSON feed.
pub struct CbrClient {
    client: reqwest::Client,
    url: String,
}

impl CbrClient {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    /// Return the response unchanged on success, or an
    /// [`RateProviderError::ApiError`] with status and body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RateProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RateProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RateProvider for CbrClient {
    async fn daily_rates(&self, date: NaiveDate) -> Result<DailyRates, RateProviderError> {
        let date_req = date.format(PROVIDER_DATE_FORMAT).to_string();
        tracing::debug!(url = %self.url, %date_req, "Requesting daily rates");

        let response = self
            .client
            .get(&self.url)
            .query(&[("date_req", date_req.as_str())])
            .send()
            .await?;

        let rates = Self::ensure_success(response).await?.json::<DailyRates>().await?;
        tracing::debug!(count = rates.valute.len(), "Received daily rates");
        Ok(rates)
    }
}
