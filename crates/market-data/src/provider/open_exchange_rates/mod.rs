//! Open Exchange Rates provider.
//!
//! Fetches the published rate table from <https://openexchangerates.org>.
//! The free plan quotes every currency against USD:
//!
//! ```json
//! { "base": "USD", "timestamp": 1700000000, "rates": { "EUR": 0.91, "RUB": 90.1 } }
//! ```
//!
//! Points in time before the current UTC day are served from the
//! `historical/YYYY-MM-DD.json` endpoint, everything else from `latest.json`.

mod models;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::RateTable;
use crate::provider::RateProvider;

use models::{OxrErrorResponse, OxrRatesResponse};

/// Provider ID constant
const PROVIDER_ID: &str = "OPEN_EXCHANGE_RATES";

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://openexchangerates.org/api";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Open Exchange Rates provider.
///
/// # Example
///
/// ```ignore
/// use ratekeeper_market_data::OpenExchangeRatesProvider;
///
/// let provider = OpenExchangeRatesProvider::new("your_app_id");
/// let table = provider.fetch_rates(chrono::Utc::now()).await?;
/// ```
pub struct OpenExchangeRatesProvider {
    client: Client,
    base_url: String,
    app_id: String,
}

impl OpenExchangeRatesProvider {
    /// Create a provider against the public API.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self::with_base_url(app_id, DEFAULT_BASE_URL)
    }

    /// Create a provider against a custom API root (self-hosted mirror, test server).
    pub fn with_base_url(app_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
        }
    }

    /// Replace the HTTP client with one using a different request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        self
    }

    /// Endpoint path (relative to the API root) serving the table for `at`.
    fn endpoint_path(at: DateTime<Utc>, today: NaiveDate) -> String {
        let date = at.date_naive();
        if date >= today {
            "latest.json".to_string()
        } else {
            format!("historical/{}.json", date.format("%Y-%m-%d"))
        }
    }

    fn map_send_error(err: reqwest::Error) -> MarketDataError {
        if err.is_timeout() {
            MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            MarketDataError::Network(err)
        }
    }

    fn map_status_error(status: StatusCode, body: &str) -> MarketDataError {
        let message = serde_json::from_str::<OxrErrorResponse>(body)
            .ok()
            .and_then(|e| e.description.or(e.message))
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MarketDataError::Unauthorized {
                provider: PROVIDER_ID.to_string(),
                message,
            },
            StatusCode::TOO_MANY_REQUESTS => MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            },
            _ => MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message,
            },
        }
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_rates(&self, at: DateTime<Utc>) -> Result<RateTable, MarketDataError> {
        let path = Self::endpoint_path(at, Utc::now().date_naive());
        debug!("Fetching {} from {}", path, PROVIDER_ID);

        // The app id is a credential: keep it out of the log line above.
        let url = format!(
            "{}/{}?app_id={}",
            self.base_url,
            path,
            urlencoding::encode(&self.app_id)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status_error(status, &body));
        }

        let payload: OxrRatesResponse =
            response
                .json()
                .await
                .map_err(|e| MarketDataError::InvalidResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        let published_at = DateTime::from_timestamp(payload.timestamp, 0).ok_or_else(|| {
            MarketDataError::InvalidResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("timestamp out of range: {}", payload.timestamp),
            }
        })?;

        debug!(
            "{} returned {} rates against {}",
            PROVIDER_ID,
            payload.rates.len(),
            payload.base
        );

        Ok(RateTable::new(
            payload.base,
            published_at,
            payload.rates,
            PROVIDER_ID,
        ))
    }
}
