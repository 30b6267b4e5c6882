use chrono::{DateTime, Utc};
use ratekeeper_core::rates::{Conversion, Observation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored rate on the wire.
///
/// Field names are kept from the first version of the service; `exchange_to_rub`
/// carries the rate against whatever reference currency is configured.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ObservationDto {
    pub id: i64,
    /// Currency code
    pub name: String,
    /// Units of the reference currency per one unit of `name`
    pub exchange_to_rub: f64,
    pub update_time: DateTime<Utc>,
}

impl From<Observation> for ObservationDto {
    fn from(o: Observation) -> Self {
        Self {
            id: o.id,
            name: o.code,
            exchange_to_rub: o.rate_to_reference,
            update_time: o.captured_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ConversionDto {
    pub name: String,
    /// Amount of the target currency
    pub amount: f64,
    pub reference_currency: String,
    /// Amount of the reference currency that was converted
    pub reference_amount: f64,
    pub exchange_to_rub: f64,
    pub update_time: DateTime<Utc>,
}

impl ConversionDto {
    pub fn new(conversion: Conversion, reference_currency: &str) -> Self {
        Self {
            name: conversion.code,
            amount: conversion.amount,
            reference_currency: reference_currency.to_string(),
            reference_amount: conversion.reference_amount,
            exchange_to_rub: conversion.rate_to_reference,
            update_time: conversion.captured_at,
        }
    }
}
