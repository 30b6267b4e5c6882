use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Currency, ProviderId};

/// Raw exchange rates as published by a provider.
///
/// `rates[code]` is the amount of `code` that one unit of `base` buys, so
/// `rates[base]` is `1.0` when the provider includes its own base.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateTable {
    /// Currency the provider quotes against (e.g. USD for Open Exchange Rates)
    pub base: Currency,

    /// When the provider says the rates were published
    pub published_at: DateTime<Utc>,

    /// Currency code -> units of that currency per one unit of `base`
    pub rates: HashMap<String, f64>,

    /// Provider that produced the table
    pub source: ProviderId,
}

impl RateTable {
    pub fn new(
        base: impl Into<Currency>,
        published_at: DateTime<Utc>,
        rates: HashMap<String, f64>,
        source: impl Into<ProviderId>,
    ) -> Self {
        Self {
            base: base.into(),
            published_at,
            rates,
            source: source.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
