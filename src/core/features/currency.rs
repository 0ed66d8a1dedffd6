//! Currency converter feature
//!
//! Converts between 10 major currencies using a USD-relative rate set that
//! is fetched live on section activation, with a static fallback table.

pub mod service;
pub mod source;
pub mod store;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;

use self::service::CurrencyService;
use self::types::{RateStatus, SUPPORTED_CURRENCIES};
use super::{Category, FeatureAsync, FeatureSync};
use crate::core::format::{format_currency_amount, format_currency_rate};
use crate::shared::error::ConverterResult;
use crate::shared::types::Conversion;

#[derive(Clone)]
pub struct CurrencyFeature {
    service: Arc<CurrencyService>,
}

impl CurrencyFeature {
    pub fn new(service: Arc<CurrencyService>) -> Self {
        Self { service }
    }
}

impl FeatureSync for CurrencyFeature {
    fn category(&self) -> Category {
        Category::Currency
    }

    fn units(&self) -> Vec<String> {
        SUPPORTED_CURRENCIES.iter().map(|code| code.to_string()).collect()
    }

    fn default_units(&self) -> (String, String) {
        ("USD".to_string(), "EUR".to_string())
    }

    fn default_value(&self) -> &'static str {
        "1"
    }

    /// Never fails: codes without a rate yield 0.
    fn convert(&self, value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<Conversion> {
        let result = self.service.convert_currency(value, from_unit, to_unit);
        let rate = self.service.rate(from_unit, to_unit);
        let formatted_rate = format_currency_rate(rate);

        Ok(Conversion {
            result,
            formatted_result: format_currency_amount(result),
            rate,
            rate_text: format!("1 {} = {} {}", from_unit, formatted_rate, to_unit),
            formatted_rate,
        })
    }
}

#[async_trait]
impl FeatureAsync for CurrencyFeature {
    async fn activate(&self) -> Option<RateStatus> {
        Some(self.service.refresh().await.status())
    }
}
