//! Rate provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::RateTable;

/// Trait for exchange rate sources.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use ratekeeper_market_data::{MarketDataError, RateProvider, RateTable};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl RateProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn fetch_rates(&self, at: DateTime<Utc>) -> Result<RateTable, MarketDataError> {
///         let rates = HashMap::from([("USD".to_string(), 1.0), ("RUB".to_string(), 90.0)]);
///         Ok(RateTable::new("USD", at, rates, "FIXED"))
///     }
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "OPEN_EXCHANGE_RATES".
    /// Used for logging and as the `source` of returned tables.
    fn id(&self) -> &'static str;

    /// Fetch the rate table in effect at `at`.
    ///
    /// Providers that only publish daily tables resolve `at` to its UTC date;
    /// a point in the current day returns the latest table.
    async fn fetch_rates(&self, at: DateTime<Utc>) -> Result<RateTable, MarketDataError>;
}
