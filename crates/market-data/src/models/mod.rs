//! Market data models
//!
//! - `types` - Type aliases for common identifiers (ProviderId, Currency)
//! - `rate_table` - Raw provider rates (RateTable)

mod rate_table;
mod types;

pub use rate_table::RateTable;
pub use types::{Currency, ProviderId};
