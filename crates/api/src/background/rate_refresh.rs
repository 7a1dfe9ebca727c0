//! Periodic refresh of today's exchange rates.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::rates::RateIngestor;

/// Run the refresh loop until `cancel` is triggered.
///
/// The first tick fires immediately, so rates are fetched at startup.
/// Failures are logged and retried on the next tick.
pub async fn run(ingestor: RateIngestor, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Rate refresh job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Rate refresh job stopping");
                break;
            }
            _ = ticker.tick() => {
                let today = Utc::now().date_naive();
                match ingestor.update(today).await {
                    Ok(written) => {
                        tracing::debug!(%today, written, "Rate refresh: run complete");
                    }
                    Err(e) => {
                        tracing::error!(%today, error = %e, "Rate refresh: update failed");
                    }
                }
            }
        }
    }
}
