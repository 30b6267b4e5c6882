//! Open Exchange Rates API response models.

use serde::Deserialize;
use std::collections::HashMap;

/// Body of `latest.json` and `historical/*.json`.
///
/// The API also sends `disclaimer` and `license`; they are ignored.
#[derive(Debug, Deserialize)]
pub struct OxrRatesResponse {
    pub base: String,
    /// Unix seconds
    pub timestamp: i64,
    pub rates: HashMap<String, f64>,
}

/// Error body sent with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct OxrErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
