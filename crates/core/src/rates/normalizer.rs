//! Conversion of raw provider rates into reference-currency rates.
//!
//! A provider publishes `raw[code]` = units of `code` per one unit of its own
//! base currency. With `r = raw[reference]`, one unit of `code` is worth
//! `r / raw[code]` units of the reference currency; the provider's base cancels
//! out and never appears in the output.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::currency::normalize_currency_code;
use super::rates_errors::RatesError;
use super::rates_model::NewObservation;

/// Result of normalizing one raw table.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// One observation per surviving code, sorted by code
    pub observations: Vec<NewObservation>,
    /// Raw codes that were dropped
    pub skipped: Vec<String>,
}

/// Units of the reference currency per one unit of a code.
///
/// Both arguments are quoted per unit of the provider's base currency:
/// `reference_per_base` is the raw rate of the reference currency and
/// `code_per_base` the raw rate of the code being converted. The result is
/// `reference_per_base / code_per_base`; the inverse orientation would
/// silently flip every stored rate.
pub fn reference_units_per_code_unit(reference_per_base: f64, code_per_base: f64) -> f64 {
    reference_per_base / code_per_base
}

fn is_usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Normalizes a raw table against `reference_code`.
///
/// Fails without producing anything when the reference currency is absent
/// or its rate is not positive and finite. Individual codes with unusable
/// rates, invalid codes, and codes that collide after case normalization
/// are skipped. The reference currency itself is kept with a rate of 1.
pub fn normalize(
    raw: &HashMap<String, f64>,
    reference_code: &str,
    captured_at: DateTime<Utc>,
) -> Result<Normalized, RatesError> {
    let reference =
        normalize_currency_code(reference_code).ok_or_else(|| RatesError::MissingReferenceRate {
            reference: reference_code.to_string(),
        })?;

    let mut skipped = Vec::new();

    // Sorted so that case collisions resolve the same way on every run.
    let mut keys: Vec<&String> = raw.keys().collect();
    keys.sort();

    let mut by_code: BTreeMap<String, f64> = BTreeMap::new();
    for key in keys {
        match normalize_currency_code(key) {
            Some(code) if by_code.contains_key(&code) => {
                warn!("Skipping duplicate currency code {:?} (normalized to {})", key, code);
                skipped.push(key.clone());
            }
            Some(code) => {
                by_code.insert(code, raw[key]);
            }
            None => {
                warn!("Skipping invalid currency code {:?}", key);
                skipped.push(key.clone());
            }
        }
    }

    let reference_rate = *by_code
        .get(&reference)
        .ok_or_else(|| RatesError::MissingReferenceRate {
            reference: reference.clone(),
        })?;
    if !is_usable_rate(reference_rate) {
        return Err(RatesError::InvalidReferenceRate {
            reference,
            rate: reference_rate,
        });
    }

    let mut observations = Vec::with_capacity(by_code.len());
    for (code, raw_rate) in by_code {
        if !is_usable_rate(raw_rate) {
            debug!("Skipping {}: raw rate {} is not positive and finite", code, raw_rate);
            skipped.push(code);
            continue;
        }

        let rate_to_reference = reference_units_per_code_unit(reference_rate, raw_rate);
        if !is_usable_rate(rate_to_reference) {
            debug!("Skipping {}: normalized rate {} overflowed", code, rate_to_reference);
            skipped.push(code);
            continue;
        }

        observations.push(NewObservation {
            code,
            rate_to_reference,
            captured_at,
        });
    }

    Ok(Normalized {
        observations,
        skipped,
    })
}
