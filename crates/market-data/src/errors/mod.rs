//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all rate fetching operations
//! - [`RetryClass`]: Classification for determining whether the next refresh cycle can help

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching rates from a provider.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method. No variant is retried inside a refresh cycle; the classification only tells
/// the caller whether waiting for the next scheduled cycle is expected to help.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rejected the credentials (HTTP 401/403).
    /// Retrying with the same configuration won't help.
    #[error("Unauthorized: {provider} - {message}")]
    Unauthorized {
        /// The provider that rejected the request
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (non-success HTTP status).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered, but the payload could not be understood.
    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that sent the payload
        provider: String,
        /// Description of what was wrong with it
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::NextCycle`]: transient, the next scheduled refresh may succeed
    /// - [`RetryClass::Never`]: configuration or contract problem, needs an operator
    ///
    /// # Examples
    ///
    /// ```
    /// use ratekeeper_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "OPEN_EXCHANGE_RATES".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::NextCycle);
    ///
    /// let error = MarketDataError::Unauthorized {
    ///     provider: "OPEN_EXCHANGE_RATES".to_string(),
    ///     message: "invalid_app_id".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Unauthorized { .. } | Self::InvalidResponse { .. } => RetryClass::Never,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => RetryClass::NextCycle,
        }
    }
}
