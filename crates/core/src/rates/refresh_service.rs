use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use ratekeeper_market_data::RateProvider;

use super::normalizer::normalize;
use super::rates_model::{capture_timestamp, RefreshReport};
use super::rates_traits::{ObservationRepositoryTrait, RefreshServiceTrait};
use crate::errors::Result;

/// One fetch, normalize, store pass.
///
/// Nothing is written unless the whole table normalizes; a failed store
/// leaves no partial batch behind.
pub struct RefreshService {
    provider: Arc<dyn RateProvider>,
    repository: Arc<dyn ObservationRepositoryTrait>,
    reference_currency: String,
}

impl RefreshService {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        repository: Arc<dyn ObservationRepositoryTrait>,
        reference_currency: String,
    ) -> Self {
        Self {
            provider,
            repository,
            reference_currency,
        }
    }
}

#[async_trait]
impl RefreshServiceTrait for RefreshService {
    async fn refresh(&self) -> Result<RefreshReport> {
        let captured_at = capture_timestamp(Utc::now());
        debug!(
            "Refreshing rates from {} at {}",
            self.provider.id(),
            captured_at.to_rfc3339()
        );

        let table = self.provider.fetch_rates(captured_at).await?;
        debug!(
            "{} returned {} raw rates against {} published at {}",
            table.source,
            table.len(),
            table.base,
            table.published_at.to_rfc3339()
        );

        let normalized = normalize(&table.rates, &self.reference_currency, captured_at)?;
        if !normalized.skipped.is_empty() {
            warn!(
                "Skipped {} unusable rates from {}: {}",
                normalized.skipped.len(),
                table.source,
                normalized.skipped.join(", ")
            );
        }

        let stored = self.repository.insert_batch(normalized.observations).await?;
        info!(
            "Stored {} observations against {} captured at {}",
            stored,
            self.reference_currency,
            captured_at.to_rfc3339()
        );

        Ok(RefreshReport {
            captured_at,
            published_at: table.published_at,
            source: table.source.into_owned(),
            reference_currency: self.reference_currency.clone(),
            stored,
            skipped: normalized.skipped,
        })
    }
}
