//! Ratekeeper Core - Domain entities, services, and traits.
//!
//! This crate contains the rate ingestion pipeline and the time-series query
//! layer. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod rates;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
