use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background jobs after the server stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Public base URL that uploaded form files are served from.
    pub avatar_base_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Exchange-rate provider and refresh job settings.
    pub rates: RatesConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `HOST`                 | `0.0.0.0`                       |
    /// | `PORT`                 | `3000`                          |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                            |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                            |
    /// | `AVATAR_BASE_URL`      | `http://localhost:3000/uploads` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let avatar_base_url = std::env::var("AVATAR_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/uploads".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            avatar_base_url,
            jwt: JwtConfig::from_env(),
            rates: RatesConfig::from_env(),
        }
    }
}

/// Settings for the exchange-rate provider and the periodic refresh job.
#[derive(Debug, Clone)]
pub struct RatesConfig {
    /// Daily rates endpoint; called with `?date_req=DD/MM/YYYY`.
    pub provider_url: String,
    /// Reference currency stored with value 1 (default: `RUB`).
    pub base_currency: String,
    /// Whether the background refresh job runs.
    pub refresh_enabled: bool,
    /// Seconds between refresh runs.
    pub refresh_interval_secs: u64,
}

impl RatesConfig {
    /// Load rate settings from environment variables.
    ///
    /// | Env Var                       | Default                                     |
    /// |-------------------------------|---------------------------------------------|
    /// | `RATES_PROVIDER_URL`          | `https://www.cbr-xml-daily.ru/daily_json.js`|
    /// | `RATES_BASE_CURRENCY`         | `RUB`                                       |
    /// | `RATES_REFRESH_ENABLED`       | `false`                                     |
    /// | `RATES_REFRESH_INTERVAL_SECS` | `3600`                                      |
    ///
    /// Panics when the refresh interval is not a positive integer.
    pub fn from_env() -> Self {
        let provider_url = std::env::var("RATES_PROVIDER_URL")
            .unwrap_or_else(|_| "https://www.cbr-xml-daily.ru/daily_json.js".into());

        let base_currency = std::env::var("RATES_BASE_CURRENCY")
            .unwrap_or_else(|_| cabinet_core::currency::DEFAULT_BASE.into());

        let refresh_enabled = std::env::var("RATES_REFRESH_ENABLED")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let refresh_interval_secs =
            parse_refresh_interval(std::env::var("RATES_REFRESH_INTERVAL_SECS").ok().as_deref());

        Self {
            provider_url,
            base_currency,
            refresh_enabled,
            refresh_interval_secs,
        }
    }
}

/// Seconds between refresh runs; zero would make the job's ticker panic.
fn parse_refresh_interval(raw: Option<&str>) -> u64 {
    let secs: u64 = raw
        .unwrap_or("3600")
        .trim()
        .parse()
        .expect("RATES_REFRESH_INTERVAL_SECS must be a valid u64");
    assert!(secs > 0, "RATES_REFRESH_INTERVAL_SECS must be greater than zero");
    secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_defaults_to_an_hour() {
        assert_eq!(parse_refresh_interval(None), 3600);
        assert_eq!(parse_refresh_interval(Some("60")), 60);
    }

    #[test]
    #[should_panic(expected = "greater than zero")]
    fn zero_refresh_interval_is_rejected() {
        parse_refresh_interval(Some("0"));
    }
}
