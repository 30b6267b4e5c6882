//! In-memory doubles for the rates pipeline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ratekeeper_market_data::{MarketDataError, RateProvider, RateTable};

use super::rates_model::{NewObservation, Observation, TimeRange};
use super::rates_traits::ObservationRepositoryTrait;
use crate::errors::{DatabaseError, Result};

#[derive(Default)]
pub struct InMemoryObservationRepository {
    rows: RwLock<Vec<Observation>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryObservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    fn latest_in<'a>(
        rows: impl Iterator<Item = &'a Observation>,
        as_of: Option<DateTime<Utc>>,
    ) -> Option<&'a Observation> {
        rows.filter(|o| as_of.map_or(true, |at| o.captured_at <= at))
            .max_by_key(|o| (o.captured_at, o.id))
    }
}

#[async_trait]
impl ObservationRepositoryTrait for InMemoryObservationRepository {
    async fn insert_batch(&self, observations: Vec<NewObservation>) -> Result<usize> {
        if *self.fail_writes.lock().unwrap() {
            return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        }
        let mut rows = self.rows.write().unwrap();
        let count = observations.len();
        for new in observations {
            let id = rows.len() as i64 + 1;
            rows.push(Observation {
                id,
                code: new.code,
                rate_to_reference: new.rate_to_reference,
                captured_at: new.captured_at,
            });
        }
        Ok(count)
    }

    fn get_history(&self, code: &str, range: &TimeRange) -> Result<Vec<Observation>> {
        let rows = self.rows.read().unwrap();
        let mut history: Vec<Observation> = rows
            .iter()
            .filter(|o| o.code == code && range.contains(o.captured_at))
            .cloned()
            .collect();
        history.sort_by_key(|o| (o.captured_at, o.id));
        Ok(history)
    }

    fn get_latest(
        &self,
        code: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Option<Observation>> {
        let rows = self.rows.read().unwrap();
        Ok(Self::latest_in(rows.iter().filter(|o| o.code == code), as_of).cloned())
    }

    fn get_latest_snapshot(&self, as_of: Option<DateTime<Utc>>) -> Result<Vec<Observation>> {
        let rows = self.rows.read().unwrap();
        let mut by_code: HashMap<&str, Vec<&Observation>> = HashMap::new();
        for row in rows.iter() {
            by_code.entry(row.code.as_str()).or_default().push(row);
        }
        let mut snapshot: Vec<Observation> = by_code
            .into_values()
            .filter_map(|series| Self::latest_in(series.into_iter(), as_of).cloned())
            .collect();
        snapshot.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(snapshot)
    }
}

/// What the fake provider answers with.
pub enum FakeResponse {
    Table(HashMap<String, f64>),
    Unauthorized,
    Timeout,
}

/// Provider double that serves a fixed response and counts calls.
pub struct FakeRateProvider {
    response: FakeResponse,
    delay: Option<Duration>,
    panic_on_fetch: bool,
    pub calls: Arc<AtomicUsize>,
}

impl FakeRateProvider {
    pub fn with_rates(pairs: &[(&str, f64)]) -> Self {
        Self::with_response(FakeResponse::Table(
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        ))
    }

    pub fn with_response(response: FakeResponse) -> Self {
        Self {
            response,
            delay: None,
            panic_on_fetch: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_fetch = true;
        self
    }
}

#[async_trait]
impl RateProvider for FakeRateProvider {
    fn id(&self) -> &'static str {
        "FAKE"
    }

    async fn fetch_rates(&self, at: DateTime<Utc>) -> std::result::Result<RateTable, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on_fetch {
            panic!("provider blew up");
        }
        match &self.response {
            FakeResponse::Table(rates) => Ok(RateTable::new("USD", at, rates.clone(), "FAKE")),
            FakeResponse::Unauthorized => Err(MarketDataError::Unauthorized {
                provider: "FAKE".to_string(),
                message: "invalid_app_id".to_string(),
            }),
            FakeResponse::Timeout => Err(MarketDataError::Timeout {
                provider: "FAKE".to_string(),
            }),
        }
    }
}
