use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::currency::parse_currency_code;
use super::rates_errors::RatesError;
use super::rates_model::{Conversion, Observation, TimeRange};
use super::rates_traits::{ObservationRepositoryTrait, RateServiceTrait};
use crate::errors::{Result, ValidationError};

/// Read side of the rates store.
///
/// Codes are case-normalized before they reach the repository, so `usd` and
/// `USD` resolve to the same series.
#[derive(Clone)]
pub struct RateService {
    repository: Arc<dyn ObservationRepositoryTrait>,
    reference_currency: String,
}

impl RateService {
    pub fn new(repository: Arc<dyn ObservationRepositoryTrait>, reference_currency: String) -> Self {
        Self {
            repository,
            reference_currency,
        }
    }
}

impl RateServiceTrait for RateService {
    fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    fn get_history(&self, code: &str, range: &TimeRange) -> Result<Vec<Observation>> {
        let code = parse_currency_code(Some(code))?;
        self.repository.get_history(&code, range)
    }

    fn get_latest(&self, code: &str, as_of: Option<DateTime<Utc>>) -> Result<Observation> {
        let code = parse_currency_code(Some(code))?;
        self.repository
            .get_latest(&code, as_of)?
            .ok_or_else(|| RatesError::CurrencyNotFound(code).into())
    }

    fn get_latest_snapshot(&self, as_of: Option<DateTime<Utc>>) -> Result<Vec<Observation>> {
        self.repository.get_latest_snapshot(as_of)
    }

    fn convert_from_reference(
        &self,
        code: &str,
        amount: f64,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Conversion> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::InvalidInput(format!(
                "amount must be a non-negative number, got {}",
                amount
            ))
            .into());
        }

        let observation = self.get_latest(code, as_of)?;
        let converted = amount / observation.rate_to_reference;
        if !converted.is_finite() {
            return Err(ValidationError::InvalidInput(format!(
                "amount {} is out of range for {}",
                amount, observation.code
            ))
            .into());
        }

        Ok(Conversion {
            code: observation.code,
            reference_amount: amount,
            amount: converted,
            rate_to_reference: observation.rate_to_reference,
            captured_at: observation.captured_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::rates::rates_model::NewObservation;
    use crate::rates::test_support::InMemoryObservationRepository;
    use crate::rates::ObservationRepositoryTrait;
    use chrono::{Duration, TimeZone};

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn obs(code: &str, rate: f64, at: DateTime<Utc>) -> NewObservation {
        NewObservation {
            code: code.to_string(),
            rate_to_reference: rate,
            captured_at: at,
        }
    }

    async fn seeded() -> RateService {
        let repo = Arc::new(InMemoryObservationRepository::new());
        repo.insert_batch(vec![obs("USD", 90.0, t(1)), obs("EUR", 100.0, t(1))])
            .await
            .unwrap();
        repo.insert_batch(vec![obs("USD", 91.0, t(2))]).await.unwrap();
        RateService::new(repo, "RUB".to_string())
    }

    #[tokio::test]
    async fn test_latest_is_case_insensitive() {
        let service = seeded().await;
        let latest = service.get_latest("usd", None).unwrap();
        assert_eq!(latest.code, "USD");
        assert_eq!(latest.rate_to_reference, 91.0);
    }

    #[tokio::test]
    async fn test_latest_as_of_earlier_time() {
        let service = seeded().await;
        let latest = service.get_latest("USD", Some(t(1))).unwrap();
        assert_eq!(latest.rate_to_reference, 90.0);
    }

    #[tokio::test]
    async fn test_latest_unknown_code_is_not_found() {
        let service = seeded().await;
        match service.get_latest("GBP", None) {
            Err(Error::Rates(RatesError::CurrencyNotFound(code))) => assert_eq!(code, "GBP"),
            other => panic!("expected CurrencyNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_latest_before_first_observation_is_not_found() {
        let service = seeded().await;
        let result = service.get_latest("USD", Some(t(1) - Duration::seconds(1)));
        assert!(matches!(
            result,
            Err(Error::Rates(RatesError::CurrencyNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_history_unknown_code_is_empty() {
        let service = seeded().await;
        assert!(service.get_history("GBP", &TimeRange::all()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_rejects_invalid_code() {
        let service = seeded().await;
        assert!(matches!(
            service.get_history("U$D", &TimeRange::all()),
            Err(Error::Validation(ValidationError::InvalidCurrencyCode(_)))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_reports_each_code_once() {
        let service = seeded().await;
        let snapshot = service.get_latest_snapshot(None).unwrap();
        let pairs: Vec<(&str, f64)> = snapshot
            .iter()
            .map(|o| (o.code.as_str(), o.rate_to_reference))
            .collect();
        assert_eq!(pairs, vec![("EUR", 100.0), ("USD", 91.0)]);
    }

    #[tokio::test]
    async fn test_convert_divides_by_rate() {
        let service = seeded().await;
        let conversion = service.convert_from_reference("EUR", 1000.0, None).unwrap();
        assert_eq!(conversion.code, "EUR");
        assert!((conversion.amount - 10.0).abs() < 1e-9);
        assert_eq!(conversion.captured_at, t(1));
    }

    #[tokio::test]
    async fn test_convert_rejects_bad_amounts() {
        let service = seeded().await;
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                service.convert_from_reference("EUR", amount, None),
                Err(Error::Validation(ValidationError::InvalidInput(_)))
            ));
        }
    }

    #[tokio::test]
    async fn test_convert_rejects_overflowing_result() {
        let repo = Arc::new(InMemoryObservationRepository::new());
        repo.insert_batch(vec![obs("JPY", 0.01, t(1))]).await.unwrap();
        let service = RateService::new(repo, "RUB".to_string());

        assert!(matches!(
            service.convert_from_reference("JPY", 1e308, None),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
        assert!(service.convert_from_reference("JPY", 1.0, None).is_ok());
    }
}
