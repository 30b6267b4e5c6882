use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// One immutable (code, rate, timestamp) record produced by a refresh cycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Store-assigned insertion sequence; breaks ties between equal timestamps
    pub id: i64,
    pub code: String,
    /// Units of the reference currency per one unit of `code`
    pub rate_to_reference: f64,
    pub captured_at: DateTime<Utc>,
}

/// An observation that has not been stored yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewObservation {
    pub code: String,
    pub rate_to_reference: f64,
    pub captured_at: DateTime<Utc>,
}

/// Inclusive bounds on `captured_at`. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ValidationError::InvalidInput(format!(
                    "range start {} is after range end {}",
                    from.to_rfc3339(),
                    to.to_rfc3339()
                ))
                .into());
            }
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

/// Outcome of one successful refresh cycle.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub captured_at: DateTime<Utc>,
    /// When the source says its table was published
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub reference_currency: String,
    pub stored: usize,
    /// Raw codes dropped by normalization
    pub skipped: Vec<String>,
}

/// An amount of the reference currency expressed in another currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub code: String,
    pub reference_amount: f64,
    pub amount: f64,
    pub rate_to_reference: f64,
    pub captured_at: DateTime<Utc>,
}

/// Stamp for a refresh cycle.
///
/// Storage keeps microseconds; truncating here makes stored and in-memory
/// timestamps compare equal.
pub fn capture_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(6)
}
