use super::rates_model::{Conversion, NewObservation, Observation, RefreshReport, TimeRange};
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Trait defining the contract for observation storage.
///
/// Observations are append-only. Reads see every batch whose write has
/// returned, and never a part of one.
#[async_trait]
pub trait ObservationRepositoryTrait: Send + Sync {
    /// Appends a batch in one transaction. Either every row is stored or none.
    async fn insert_batch(&self, observations: Vec<NewObservation>) -> Result<usize>;

    /// All observations of `code` inside `range`, ordered by
    /// `(captured_at, id)` ascending.
    fn get_history(&self, code: &str, range: &TimeRange) -> Result<Vec<Observation>>;

    /// Observation of `code` with the greatest `captured_at` not after
    /// `as_of`; ties go to the greater id.
    fn get_latest(&self, code: &str, as_of: Option<DateTime<Utc>>)
        -> Result<Option<Observation>>;

    /// The latest observation of every known code, ordered by code.
    fn get_latest_snapshot(&self, as_of: Option<DateTime<Utc>>) -> Result<Vec<Observation>>;
}

/// Trait defining the contract for one refresh cycle.
#[async_trait]
pub trait RefreshServiceTrait: Send + Sync {
    async fn refresh(&self) -> Result<RefreshReport>;
}

/// Trait defining the contract for rate queries.
pub trait RateServiceTrait: Send + Sync {
    fn reference_currency(&self) -> &str;

    fn get_history(&self, code: &str, range: &TimeRange) -> Result<Vec<Observation>>;

    /// Fails with `CurrencyNotFound` when nothing was observed for `code`
    /// at or before `as_of`.
    fn get_latest(&self, code: &str, as_of: Option<DateTime<Utc>>) -> Result<Observation>;

    fn get_latest_snapshot(&self, as_of: Option<DateTime<Utc>>) -> Result<Vec<Observation>>;

    /// Expresses `amount` units of the reference currency in `code`.
    fn convert_from_reference(
        &self,
        code: &str,
        amount: f64,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Conversion>;
}
