use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use ratekeeper_core::constants::{DEFAULT_REFERENCE_CURRENCY, DEFAULT_REFRESH_INTERVAL_SECS};
use ratekeeper_core::rates::normalize_currency_code;
use ratekeeper_market_data::provider::open_exchange_rates::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{}', expected 'text' or 'json'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub reference_currency: String,
    pub refresh_interval: Duration,
    pub rates_api_url: String,
    pub rates_app_id: Option<String>,
    pub rates_timeout: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: "./db/currencies.db".to_string(),
            reference_currency: DEFAULT_REFERENCE_CURRENCY.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            rates_api_url: DEFAULT_BASE_URL.to_string(),
            rates_app_id: None,
            rates_timeout: Duration::from_millis(30_000),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            log_format: LogFormat::Text,
        }
    }
}

fn lookup_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup_var(lookup, name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {}='{}': {}", name, raw, e)),
        None => Ok(None),
    }
}

impl Config {
    /// Reads `RK_*` variables (after loading `.env` if present) over the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let listen_addr = parse_var(&lookup, "RK_LISTEN_ADDR")?.unwrap_or(defaults.listen_addr);
        let db_path = lookup_var(&lookup, "RK_DB_PATH").unwrap_or(defaults.db_path);

        let reference_currency = match lookup_var(&lookup, "RK_REFERENCE_CURRENCY") {
            Some(raw) => normalize_currency_code(&raw)
                .with_context(|| format!("Invalid RK_REFERENCE_CURRENCY='{}'", raw))?,
            None => defaults.reference_currency,
        };

        let refresh_secs: u64 = parse_var(&lookup, "RK_REFRESH_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);
        if refresh_secs == 0 {
            bail!("RK_REFRESH_INTERVAL_SECS must be greater than zero");
        }

        let rates_api_url =
            lookup_var(&lookup, "RK_RATES_API_URL").unwrap_or(defaults.rates_api_url);
        let rates_app_id = lookup_var(&lookup, "RK_RATES_APP_ID");

        let rates_timeout = parse_var::<u64>(&lookup, "RK_RATES_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.rates_timeout);
        let request_timeout = parse_var::<u64>(&lookup, "RK_REQUEST_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_timeout);

        let cors_allow = lookup_var(&lookup, "RK_CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_allow);

        let log_format = parse_var(&lookup, "RK_LOG_FORMAT")?.unwrap_or(defaults.log_format);

        Ok(Self {
            listen_addr,
            db_path,
            reference_currency,
            refresh_interval: Duration::from_secs(refresh_secs),
            rates_api_url,
            rates_app_id,
            rates_timeout,
            cors_allow,
            request_timeout,
            log_format,
        })
    }
}
