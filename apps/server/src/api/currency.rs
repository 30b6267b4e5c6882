use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use ratekeeper_core::errors::ValidationError;
use ratekeeper_core::rates::{parse_currency_code, TimeRange};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ConversionDto, ObservationDto},
};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Currency code, case-insensitive
    currency: Option<String>,
    /// Inclusive lower bound (RFC 3339)
    from: Option<String>,
    /// Inclusive upper bound (RFC 3339)
    to: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LatestQuery {
    currency: Option<String>,
    /// Resolve as of this instant (RFC 3339) instead of now
    at: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotQuery {
    at: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    currency: Option<String>,
    /// Amount of the reference currency
    amount: Option<String>,
    at: Option<String>,
}

fn parse_time(field: &str, raw: Option<&str>) -> ApiResult<Option<DateTime<Utc>>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| {
                ValidationError::InvalidInput(format!(
                    "'{}' is not an RFC 3339 timestamp: {}",
                    field, raw
                ))
                .into()
            }),
        None => Ok(None),
    }
}

fn parse_amount(raw: Option<&str>) -> ApiResult<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::MissingField("amount".to_string()))?;
    raw.parse::<f64>().map_err(|_| {
        ValidationError::InvalidInput(format!("'amount' is not a number: {}", raw)).into()
    })
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Core(err.into())
    }
}

#[utoipa::path(
    get,
    path = "/currency",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Every stored rate of the currency, oldest first", body = [ObservationDto]),
        (status = 400, description = "Missing or invalid parameter", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ObservationDto>>> {
    let Query(q) = query?;
    let code = parse_currency_code(q.currency.as_deref())?;
    let range = TimeRange::new(
        parse_time("from", q.from.as_deref())?,
        parse_time("to", q.to.as_deref())?,
    )?;

    let history = state.rate_service.get_history(&code, &range)?;
    Ok(Json(history.into_iter().map(ObservationDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/currency/latest",
    params(LatestQuery),
    responses(
        (status = 200, description = "Most recent rate of the currency", body = ObservationDto),
        (status = 400, description = "Missing or invalid parameter", body = crate::error::ErrorBody),
        (status = 404, description = "No rate recorded for the currency", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LatestQuery>, QueryRejection>,
) -> ApiResult<Json<ObservationDto>> {
    let Query(q) = query?;
    let code = parse_currency_code(q.currency.as_deref())?;
    let as_of = parse_time("at", q.at.as_deref())?;

    let latest = state.rate_service.get_latest(&code, as_of)?;
    Ok(Json(latest.into()))
}

#[utoipa::path(
    get,
    path = "/currency/all",
    params(SnapshotQuery),
    responses(
        (status = 200, description = "Most recent rate of every currency", body = [ObservationDto]),
        (status = 400, description = "Invalid parameter", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SnapshotQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ObservationDto>>> {
    let Query(q) = query?;
    let as_of = parse_time("at", q.at.as_deref())?;

    let snapshot = state.rate_service.get_latest_snapshot(as_of)?;
    Ok(Json(snapshot.into_iter().map(ObservationDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/currency/convert",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Reference amount expressed in the currency", body = ConversionDto),
        (status = 400, description = "Missing or invalid parameter", body = crate::error::ErrorBody),
        (status = 404, description = "No rate recorded for the currency", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> ApiResult<Json<ConversionDto>> {
    let Query(q) = query?;
    let code = parse_currency_code(q.currency.as_deref())?;
    let amount = parse_amount(q.amount.as_deref())?;
    let as_of = parse_time("at", q.at.as_deref())?;

    let conversion = state
        .rate_service
        .convert_from_reference(&code, amount, as_of)?;
    Ok(Json(ConversionDto::new(
        conversion,
        &state.reference_currency,
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currency", get(get_history))
        .route("/currency/latest", get(get_latest))
        .route("/currency/all", get(get_snapshot))
        .route("/currency/convert", get(convert))
}
