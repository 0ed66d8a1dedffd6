//! Conversion engine for the unit converter widget.
//!
//! The host page owns rendering and event wiring; it opens a section with
//! [`UnitConverter::load_section`], then feeds raw field values through
//! [`UnitConverter::convert`] or a [`ConverterForm`].

pub mod core;
pub mod logging;
pub mod shared;

pub use crate::core::features::currency::service::CurrencyService;
pub use crate::core::features::currency::source::{HttpRateSource, RateSource};
pub use crate::core::features::currency::store::{RateStore, SharedRateStore};
pub use crate::core::features::currency::types::{FetchOutcome, RateStatus, RateTable};
pub use crate::core::features::form::ConverterForm;
pub use crate::core::features::temperature::{convert_temperature, TemperatureUnit};
pub use crate::core::features::unit_converter::{convert_linear, linear_rate, UnitTable};
pub use crate::core::features::{Category, FeatureAsync, FeatureSync, UnitConverter};
pub use crate::shared::error::{ConverterError, ConverterResult};
pub use crate::shared::settings::Settings;
pub use crate::shared::types::{Conversion, SectionView};
