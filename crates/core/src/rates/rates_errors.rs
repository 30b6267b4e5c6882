use ratekeeper_market_data::MarketDataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatesError {
    #[error("Rate source unavailable: {0}")]
    SourceUnavailable(#[from] MarketDataError),

    #[error("Reference currency {reference} is missing from the source payload")]
    MissingReferenceRate { reference: String },

    #[error("Reference currency {reference} has an unusable rate ({rate})")]
    InvalidReferenceRate { reference: String, rate: f64 },

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),
}
