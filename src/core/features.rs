//! Converter sections with enum dispatch
//!
//! Every widget section (length, weight, ...) is a feature. The sync half of
//! the interface goes through enum_dispatch; activation is async and is
//! dispatched by hand.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod currency;
pub mod form;
pub mod temperature;
pub mod unit_converter;

use self::currency::service::CurrencyService;
use self::currency::source::HttpRateSource;
use self::currency::types::RateStatus;
use self::currency::CurrencyFeature;
use self::temperature::TemperatureFeature;
use self::unit_converter::{table_for, LinearFeature};
use crate::shared::error::{ConverterError, ConverterResult};
use crate::shared::settings::Settings;
use crate::shared::types::{Conversion, SectionView, UnitDTO};

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Volume,
    Speed,
    Area,
    Currency,
}

/// Heading and blurb shown at the top of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    pub title: &'static str,
    pub description: &'static str,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Volume,
        Category::Speed,
        Category::Area,
        Category::Currency,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Volume => "volume",
            Category::Speed => "speed",
            Category::Area => "area",
            Category::Currency => "currency",
        }
    }

    pub fn section(&self) -> SectionInfo {
        let (title, description) = match self {
            Category::Length => (
                "Length Converter",
                "Convert between meters, kilometers, miles, feet, inches, etc.",
            ),
            Category::Weight => (
                "Weight Converter",
                "Convert between kilograms, grams, pounds, ounces, etc.",
            ),
            Category::Temperature => (
                "Temperature Converter",
                "Convert between Celsius, Fahrenheit, and Kelvin.",
            ),
            Category::Volume => (
                "Volume Converter",
                "Convert between liters, milliliters, gallons, cups, etc.",
            ),
            Category::Speed => (
                "Speed Converter",
                "Convert between meters per second, kilometers per hour, miles per hour, knots, etc.",
            ),
            Category::Area => (
                "Area Converter",
                "Convert between square meters, square kilometers, square feet, acres, etc.",
            ),
            Category::Currency => (
                "Currency Converter",
                "Convert between US dollars, euros, pounds, yen and other major currencies.",
            ),
        };
        SectionInfo { title, description }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().trim_start_matches('#').to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.id() == id)
            .ok_or_else(|| ConverterError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Feature traits
// ============================================================================

/// Sync methods trait for enum_dispatch
#[enum_dispatch]
pub trait FeatureSync: Send + Sync {
    fn category(&self) -> Category;

    /// Units offered by the selectors, in display order
    fn units(&self) -> Vec<String>;

    /// (from, to) selected when the section opens
    fn default_units(&self) -> (String, String);

    /// Text the "from" field starts with
    fn default_value(&self) -> &'static str;

    fn convert(&self, value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<Conversion>;
}

/// Async methods trait (separate from enum_dispatch)
#[async_trait]
pub trait FeatureAsync: Send + Sync {
    /// Run once each time the section is opened.
    ///
    /// Only the currency section does work here; it reports its rate status.
    async fn activate(&self) -> Option<RateStatus>;
}

#[async_trait]
impl FeatureAsync for LinearFeature {
    async fn activate(&self) -> Option<RateStatus> {
        None
    }
}

#[async_trait]
impl FeatureAsync for TemperatureFeature {
    async fn activate(&self) -> Option<RateStatus> {
        None
    }
}

#[enum_dispatch(FeatureSync)]
pub enum AppFeature {
    Linear(LinearFeature),
    Temperature(TemperatureFeature),
    Currency(CurrencyFeature),
}

#[async_trait]
impl FeatureAsync for AppFeature {
    async fn activate(&self) -> Option<RateStatus> {
        match self {
            AppFeature::Linear(feature) => feature.activate().await,
            AppFeature::Temperature(feature) => feature.activate().await,
            AppFeature::Currency(feature) => feature.activate().await,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Entry point for the host UI: resolves a category to its converter.
pub struct UnitConverter {
    currency: Arc<CurrencyService>,
}

impl UnitConverter {
    pub fn new(currency: Arc<CurrencyService>) -> Self {
        Self { currency }
    }

    /// Engine backed by the HTTP rate source described in `settings`.
    pub fn from_settings(settings: &Settings) -> ConverterResult<Self> {
        let source = HttpRateSource::new(&settings.currency)?;
        Ok(Self::new(Arc::new(CurrencyService::new(Arc::new(source)))))
    }

    pub fn currency(&self) -> &Arc<CurrencyService> {
        &self.currency
    }

    pub fn feature(&self, category: Category) -> AppFeature {
        if let Some(table) = table_for(category) {
            return LinearFeature::new(category, table).into();
        }
        match category {
            Category::Temperature => TemperatureFeature.into(),
            _ => CurrencyFeature::new(Arc::clone(&self.currency)).into(),
        }
    }

    pub fn units(&self, category: Category) -> Vec<String> {
        self.feature(category).units()
    }

    pub fn convert(&self, category: Category, value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<Conversion> {
        debug!("convert {} {} -> {} ({})", value, from_unit, to_unit, category);
        self.feature(category).convert(value, from_unit, to_unit)
    }

    /// Same as [`convert`](Self::convert) with the category given by id, e.g. `"length"`.
    pub fn convert_by_id(&self, category: &str, value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<Conversion> {
        self.convert(category.parse()?, value, from_unit, to_unit)
    }

    /// Open a section: runs its activation (the currency fetch) and returns
    /// what the host needs to render it.
    pub async fn load_section(&self, category: Category) -> SectionView {
        let feature = self.feature(category);
        let info = category.section();
        let (from_unit, to_unit) = feature.default_units();

        let status = feature.activate().await;
        debug!("Section {} loaded (status: {:?})", category, status);

        SectionView {
            category,
            title: info.title.to_string(),
            description: info.description.to_string(),
            units: feature
                .units()
                .into_iter()
                .map(|id| UnitDTO {
                    id,
                    category: category.id().to_string(),
                })
                .collect(),
            from_unit,
            to_unit,
            default_value: feature.default_value().to_string(),
            status,
        }
    }
}
