use std::sync::Arc;

use ratekeeper_core::rates::{
    ObservationRepositoryTrait, RateService, RateServiceTrait, RefreshScheduler, RefreshService,
};
use ratekeeper_market_data::{OpenExchangeRatesProvider, RateProvider};
use ratekeeper_storage_sqlite::{self as storage, ObservationRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub rate_service: Arc<dyn RateServiceTrait>,
    pub refresh_scheduler: RefreshScheduler,
    pub reference_currency: String,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

/// Builds the state from an explicit rate source.
pub fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn RateProvider>,
) -> anyhow::Result<Arc<AppState>> {
    let (pool, writer) = storage::open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let repository: Arc<dyn ObservationRepositoryTrait> =
        Arc::new(ObservationRepository::new(pool, writer));

    let refresh_service = RefreshService::new(
        provider,
        repository.clone(),
        config.reference_currency.clone(),
    );
    let rate_service = RateService::new(repository, config.reference_currency.clone());

    Ok(Arc::new(AppState {
        rate_service: Arc::new(rate_service),
        refresh_scheduler: RefreshScheduler::new(Arc::new(refresh_service)),
        reference_currency: config.reference_currency.clone(),
    }))
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let app_id = match &config.rates_app_id {
        Some(app_id) => app_id.clone(),
        None => {
            tracing::warn!("RK_RATES_APP_ID is not set; rate refreshes will be rejected by the source");
            String::new()
        }
    };
    let provider = OpenExchangeRatesProvider::with_base_url(app_id, &config.rates_api_url)
        .with_timeout(config.rates_timeout);

    build_state_with_provider(config, Arc::new(provider))
}
