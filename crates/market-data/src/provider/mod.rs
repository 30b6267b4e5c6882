//! Rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RateProvider` trait that all rate sources implement
//! - Concrete provider implementations (Open Exchange Rates)
//!
//! Providers are black boxes to the rest of the system: given a point in time
//! they return a [`RateTable`](crate::RateTable) or an error. They do not
//! retry, cache, or normalize.

mod traits;

pub mod open_exchange_rates;

pub use traits::RateProvider;
