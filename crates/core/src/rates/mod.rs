//! Rates module - normalization, refresh cycles, and time-series queries.

pub mod currency;
pub mod normalizer;
mod rates_errors;
mod rates_model;
mod rates_service;
mod rates_traits;
mod refresh_scheduler;
mod refresh_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use currency::{normalize_currency_code, parse_currency_code};
pub use normalizer::{normalize, reference_units_per_code_unit, Normalized};
pub use rates_errors::RatesError;
pub use rates_model::{
    capture_timestamp, Conversion, NewObservation, Observation, RefreshReport, TimeRange,
};
pub use rates_service::RateService;
pub use rates_traits::{ObservationRepositoryTrait, RateServiceTrait, RefreshServiceTrait};
pub use refresh_scheduler::{RefreshScheduler, SchedulerState, TriggerOutcome};
pub use refresh_service::RefreshService;
