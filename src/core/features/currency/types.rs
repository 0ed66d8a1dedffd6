use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::{ConverterError, ConverterResult};

/// Every rate is expressed as units of currency per 1 USD.
pub const BASE_CURRENCY: &str = "USD";

pub const SUPPORTED_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR", "MXN",
];

/// Approximate rates used when the live fetch fails. Not live data.
pub const FALLBACK_RATES: [(&str, f64); 10] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("JPY", 149.5),
    ("AUD", 1.53),
    ("CAD", 1.36),
    ("CHF", 0.88),
    ("CNY", 7.24),
    ("INR", 83.12),
    ("MXN", 17.05),
];

pub type RateTable = HashMap<String, f64>;

pub fn fallback_rates() -> RateTable {
    FALLBACK_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), *rate))
        .collect()
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

/// Network payload from the exchange-rate endpoint.
///
/// Only `rates` is read; any other fields the provider sends are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesApiResponse {
    pub rates: HashMap<String, f64>,
}

impl RatesApiResponse {
    /// Filter down to the supported currencies.
    ///
    /// Codes are upper-cased, non-positive or non-finite rates dropped, and
    /// USD pinned to 1. A payload without a single supported foreign rate is
    /// rejected as malformed.
    pub fn into_supported(self) -> ConverterResult<RateTable> {
        let mut rates: RateTable = self
            .rates
            .into_iter()
            .map(|(code, rate)| (code.trim().to_ascii_uppercase(), rate))
            .filter(|(code, rate)| is_supported(code) && rate.is_finite() && *rate > 0.0)
            .collect();

        if !rates.keys().any(|code| code != BASE_CURRENCY) {
            return Err(ConverterError::Malformed(
                "response holds no supported currency rates".into(),
            ));
        }

        rates.insert(BASE_CURRENCY.to_string(), 1.0);
        Ok(rates)
    }
}

/// Result of one section activation's fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Live {
        rates: RateTable,
        fetched_at: DateTime<Utc>,
    },
    Fallback {
        rates: RateTable,
        reason: String,
    },
}

impl FetchOutcome {
    pub fn is_live(&self) -> bool {
        matches!(self, FetchOutcome::Live { .. })
    }

    pub fn rates(&self) -> &RateTable {
        match self {
            FetchOutcome::Live { rates, .. } | FetchOutcome::Fallback { rates, .. } => rates,
        }
    }

    pub fn status(&self) -> RateStatus {
        match self {
            FetchOutcome::Live { .. } => RateStatus::LiveRatesLoaded,
            FetchOutcome::Fallback { .. } => RateStatus::UsingFallbackRates,
        }
    }
}

/// Status indicator for the currency section.
///
/// Moves from `Loading` to one of the other two once per activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RateStatus {
    #[default]
    Loading,
    LiveRatesLoaded,
    UsingFallbackRates,
}

impl RateStatus {
    pub fn message(&self) -> &'static str {
        match self {
            RateStatus::Loading => "Loading exchange rates...",
            RateStatus::LiveRatesLoaded => "Live exchange rates loaded",
            RateStatus::UsingFallbackRates => "Using cached rates (live rates unavailable)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_table_covers_supported_set() {
        let rates = fallback_rates();
        assert_eq!(rates.len(), SUPPORTED_CURRENCIES.len());
        for code in SUPPORTED_CURRENCIES {
            assert!(rates[code] > 0.0, "{} missing", code);
        }
        assert_eq!(rates[BASE_CURRENCY], 1.0);
    }

    #[test]
    fn test_into_supported_filters() {
        let payload: RatesApiResponse = serde_json::from_str(
            r#"{
                "base": "USD",
                "date": "2026-10-18",
                "rates": {"USD": 1, "eur": 0.93, "GBP": 0.8, "BTC": 0.00001, "JPY": -1, "SEK": 10.5}
            }"#,
        )
        .unwrap();

        let rates = payload.into_supported().unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates["EUR"], 0.93);
        assert_eq!(rates["GBP"], 0.8);
        assert_eq!(rates["USD"], 1.0);
        assert!(!rates.contains_key("BTC"));
        assert!(!rates.contains_key("JPY"));
    }

    #[test]
    fn test_into_supported_pins_usd() {
        let mut raw = HashMap::new();
        raw.insert("EUR".to_string(), 0.9);
        let rates = RatesApiResponse { rates: raw }.into_supported().unwrap();
        assert_eq!(rates["USD"], 1.0);
    }

    #[test]
    fn test_into_supported_rejects_useless_payload() {
        let mut raw = HashMap::new();
        raw.insert("USD".to_string(), 1.0);
        raw.insert("XAU".to_string(), 0.0004);
        let err = RatesApiResponse { rates: raw }.into_supported().unwrap_err();
        assert!(matches!(err, ConverterError::Malformed(_)));
    }

    #[test]
    fn test_missing_rates_field_is_malformed_json() {
        assert!(serde_json::from_str::<RatesApiResponse>(r#"{"result": "error"}"#).is_err());
    }

    #[test]
    fn test_outcome_status() {
        let live = FetchOutcome::Live { rates: fallback_rates(), fetched_at: Utc::now() };
        assert!(live.is_live());
        assert_eq!(live.status(), RateStatus::LiveRatesLoaded);

        let fallback = FetchOutcome::Fallback { rates: fallback_rates(), reason: "offline".into() };
        assert!(!fallback.is_live());
        assert_eq!(fallback.status(), RateStatus::UsingFallbackRates);
        assert_eq!(fallback.rates(), &fallback_rates());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(RateStatus::default(), RateStatus::Loading);
        assert_eq!(RateStatus::Loading.message(), "Loading exchange rates...");
        assert_eq!(RateStatus::LiveRatesLoaded.message(), "Live exchange rates loaded");
        assert!(RateStatus::UsingFallbackRates.message().contains("cached rates"));
    }
}
