use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::source::RateSource;
use super::store::{RateStore, SharedRateStore};
use super::types::{fallback_rates, FetchOutcome, RateStatus, RateTable};
use crate::shared::error::ConverterResult;

/// Owns the rate-acquisition policy: one live fetch per activation,
/// fallback table on any failure, safe zero on missing rates.
///
/// Overlapping refreshes are not serialized; whichever finishes last
/// owns the rate set.
pub struct CurrencyService {
    source: Arc<dyn RateSource>,
    store: SharedRateStore,
    status: RwLock<RateStatus>,
}

impl CurrencyService {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_store(source, RateStore::new().shared())
    }

    /// Use an existing store, e.g. one pre-seeded by a test or shared with another view.
    pub fn with_store(source: Arc<dyn RateSource>, store: SharedRateStore) -> Self {
        Self {
            source,
            store,
            status: RwLock::new(RateStatus::Loading),
        }
    }

    pub fn store(&self) -> SharedRateStore {
        Arc::clone(&self.store)
    }

    pub fn status(&self) -> RateStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_updated()
    }

    /// Fetch live rates, falling back to the static table on any failure.
    pub async fn refresh(&self) -> FetchOutcome {
        self.set_status(RateStatus::Loading);

        let outcome = match self.fetch_live().await {
            Ok(rates) => {
                let fetched_at = Utc::now();
                self.store
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .set_live(rates.clone(), fetched_at);
                info!("Live rates loaded: {} currencies at {}", rates.len(), fetched_at.to_rfc3339());
                FetchOutcome::Live { rates, fetched_at }
            }
            Err(e) => {
                warn!("Rate fetch failed, using fallback rates: {}", e);
                FetchOutcome::Fallback {
                    rates: self.load_fallback_rates(),
                    reason: e.to_string(),
                }
            }
        };

        self.set_status(outcome.status());
        outcome
    }

    /// `true` when live rates were stored, `false` when the fallback table was loaded.
    pub async fn fetch_exchange_rates(&self) -> bool {
        self.refresh().await.is_live()
    }

    /// Overwrite the rate set with the static fallback table.
    pub fn load_fallback_rates(&self) -> RateTable {
        let rates = fallback_rates();
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(rates.clone());
        rates
    }

    /// `(value / rate[from]) * rate[to]`, pivoting through USD.
    ///
    /// Returns 0 when either code has no rate in the current set.
    pub fn convert_currency(&self, value: f64, from: &str, to: &str) -> f64 {
        let from = normalize_code(from);
        let to = normalize_code(to);

        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        let (Some(from_rate), Some(to_rate)) = (store.get(&from), store.get(&to)) else {
            debug!("Rate unavailable for {} -> {}, returning 0", from, to);
            return 0.0;
        };

        let result = (value / from_rate) * to_rate;
        debug!("{} {} -> {} {} (from_rate={}, to_rate={})", value, from, result, to, from_rate, to_rate);
        result
    }

    /// Rate descriptor: how many `to` one unit of `from` buys.
    pub fn rate(&self, from: &str, to: &str) -> f64 {
        self.convert_currency(1.0, from, to)
    }

    async fn fetch_live(&self) -> ConverterResult<RateTable> {
        let payload = self.source.fetch_rates().await?;
        payload.into_supported()
    }

    fn set_status(&self, status: RateStatus) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::currency::testing::StubSource;
    use crate::core::features::currency::types::FALLBACK_RATES;
    use crate::core::format::{format_currency_amount, format_currency_rate};

    fn seeded(rates: &[(&str, f64)]) -> CurrencyService {
        let mut store = RateStore::new();
        store.set(rates.iter().map(|(c, r)| (c.to_string(), *r)).collect());
        CurrencyService::with_store(Arc::new(StubSource::failing("unused")), store.shared())
    }

    #[test]
    fn test_usd_to_eur() {
        let service = seeded(&[("USD", 1.0), ("EUR", 0.92)]);
        assert_eq!(format_currency_amount(service.convert_currency(10.0, "USD", "EUR")), "9.20");
        assert_eq!(format_currency_rate(service.rate("USD", "EUR")), "0.9200");
    }

    #[test]
    fn test_cross_rate_pivots_through_usd() {
        let service = seeded(&[("USD", 1.0), ("EUR", 0.8), ("GBP", 0.5)]);
        let result = service.convert_currency(8.0, "EUR", "GBP");
        assert!((result - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_code_is_safe_zero() {
        let service = seeded(&[("USD", 1.0), ("EUR", 0.92)]);
        assert_eq!(service.convert_currency(5.0, "USD", "ZZZ"), 0.0);
        assert_eq!(service.convert_currency(5.0, "ZZZ", "USD"), 0.0);
        assert_eq!(service.rate("USD", "ZZZ"), 0.0);
    }

    #[test]
    fn test_empty_store_is_safe_zero() {
        let service = CurrencyService::new(Arc::new(StubSource::failing("unused")));
        assert_eq!(service.convert_currency(100.0, "USD", "EUR"), 0.0);
        assert_eq!(service.status(), RateStatus::Loading);
    }

    #[test]
    fn test_codes_are_normalized() {
        let service = seeded(&[("USD", 1.0), ("EUR", 0.92)]);
        assert_eq!(service.convert_currency(10.0, " usd", "eur "), service.convert_currency(10.0, "USD", "EUR"));
    }

    #[tokio::test]
    async fn test_live_fetch_stores_rates_and_timestamp() {
        let source = StubSource::with_rates(&[("USD", 1.0), ("EUR", 0.95), ("JPY", 150.0), ("BTC", 0.00002)]);
        let service = CurrencyService::new(Arc::new(source));
        let before = Utc::now();

        assert!(service.fetch_exchange_rates().await);

        assert_eq!(service.status(), RateStatus::LiveRatesLoaded);
        let store = service.store();
        let store = store.read().unwrap();
        assert_eq!(store.get("EUR"), Some(0.95));
        assert_eq!(store.get("BTC"), None);
        assert!(store.last_updated().unwrap() >= before);
        drop(store);

        assert_eq!(format_currency_amount(service.convert_currency(2.0, "USD", "JPY")), "300.00");
    }

    #[tokio::test]
    async fn test_failed_fetch_loads_fallback_exactly() {
        let service = CurrencyService::new(Arc::new(StubSource::failing("connection refused")));

        let outcome = service.refresh().await;

        assert!(!outcome.is_live());
        assert_eq!(outcome.status(), RateStatus::UsingFallbackRates);
        assert_eq!(service.status(), RateStatus::UsingFallbackRates);
        match &outcome {
            FetchOutcome::Fallback { reason, .. } => assert!(reason.contains("connection refused")),
            other => panic!("expected fallback, got {:?}", other),
        }

        let store = service.store();
        assert_eq!(store.read().unwrap().rates(), &fallback_rates());
        assert_eq!(service.last_updated(), None);

        for (code, rate) in FALLBACK_RATES {
            assert_eq!(service.rate("USD", code), rate);
        }
        assert_eq!(format_currency_amount(service.convert_currency(10.0, "USD", "EUR")), "9.20");
    }

    #[tokio::test]
    async fn test_malformed_payload_falls_back() {
        let service = CurrencyService::new(Arc::new(StubSource::with_rates(&[("XAU", 0.0004)])));
        assert!(!service.fetch_exchange_rates().await);
        assert_eq!(service.store().read().unwrap().rates(), &fallback_rates());
    }

    #[tokio::test]
    async fn test_fallback_keeps_previous_live_timestamp() {
        let store = RateStore::new().shared();
        let live = CurrencyService::with_store(
            Arc::new(StubSource::with_rates(&[("USD", 1.0), ("EUR", 0.9)])),
            Arc::clone(&store),
        );
        assert!(live.fetch_exchange_rates().await);
        let stamped = live.last_updated();
        assert!(stamped.is_some());

        let offline = CurrencyService::with_store(
            Arc::new(StubSource::failing("timeout")),
            Arc::clone(&store),
        );
        assert!(!offline.fetch_exchange_rates().await);

        assert_eq!(offline.last_updated(), stamped);
        assert_eq!(store.read().unwrap().get("EUR"), Some(0.92));
    }

    #[tokio::test]
    async fn test_each_refresh_hits_source_once() {
        let source = Arc::new(StubSource::with_rates(&[("USD", 1.0), ("EUR", 0.9)]));
        let service = CurrencyService::new(source.clone());
        service.refresh().await;
        service.refresh().await;
        assert_eq!(source.calls(), 2);
    }
}
