//! Ratekeeper Market Data Crate
//!
//! This crate fetches raw exchange rate tables from external sources.
//!
//! # Overview
//!
//! A provider answers one question: "what were the rates at this point in time?"
//! The answer is a [`RateTable`], a mapping from currency code to the amount of
//! that currency one unit of the provider's base currency buys. Providers know
//! nothing about the reference currency the rest of the system reports in; the
//! conversion into reference units happens in `ratekeeper-core`.
//!
//! ```text
//! +------------------+      fetch_rates(at)      +------------------+
//! |  RefreshService  | ------------------------> |   RateProvider   |
//! +------------------+                           +------------------+
//!          ^                                              |
//!          |                 RateTable                    v
//!          +-------------------------------------  external HTTP API
//! ```
//!
//! # Core Types
//!
//! - [`RateProvider`] - Trait implemented by every rate source
//! - [`RateTable`] - Raw rates against the provider's base currency
//! - [`MarketDataError`] - Errors, classified via [`RetryClass`]

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use models::{Currency, ProviderId, RateTable};
pub use provider::open_exchange_rates::OpenExchangeRatesProvider;
pub use provider::RateProvider;
