//! Temperature converter
//!
//! Affine conversions can't be expressed as a single factor, so every
//! conversion goes through Celsius.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Category, FeatureSync};
use crate::core::format::format_temperature;
use crate::shared::error::{ConverterError, ConverterResult};
use crate::shared::types::Conversion;

const KELVIN_OFFSET: f64 = 273.15;

/// Reference input for the info line ("0 °C = 32.00 °F").
pub const REFERENCE_VALUE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub const ALL: [TemperatureUnit; 3] = [
        TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit,
        TemperatureUnit::Kelvin,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) * (5.0 / 9.0),
            TemperatureUnit::Kelvin => value - KELVIN_OFFSET,
        }
    }

    fn celsius_to(self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureUnit::Kelvin => celsius + KELVIN_OFFSET,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = ConverterError;

    /// Accepts the selector symbols (`°C`, `°F`, `K`), bare letters and full names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "°C" | "C" => return Ok(TemperatureUnit::Celsius),
            "°F" | "F" => return Ok(TemperatureUnit::Fahrenheit),
            "K" => return Ok(TemperatureUnit::Kelvin),
            _ => {}
        }

        match s.trim().to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            _ => Err(ConverterError::invalid_unit(s, Category::Temperature.id())),
        }
    }
}

/// Convert through Celsius. Same unit on both sides returns `value` untouched.
pub fn convert_temperature(value: f64, from_unit: TemperatureUnit, to_unit: TemperatureUnit) -> f64 {
    if from_unit == to_unit {
        return value;
    }

    let celsius = from_unit.to_celsius(value);
    let result = to_unit.celsius_to(celsius);

    debug!("{} {} -> {} {} (celsius: {})", value, from_unit, result, to_unit, celsius);

    result
}

/// String-keyed variant used by the section dispatcher.
pub fn convert_temperature_units(value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<f64> {
    let from: TemperatureUnit = from_unit.parse()?;
    let to: TemperatureUnit = to_unit.parse()?;
    Ok(convert_temperature(value, from, to))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureFeature;

impl FeatureSync for TemperatureFeature {
    fn category(&self) -> Category {
        Category::Temperature
    }

    fn units(&self) -> Vec<String> {
        TemperatureUnit::ALL.iter().map(|unit| unit.symbol().to_string()).collect()
    }

    fn default_units(&self) -> (String, String) {
        (
            TemperatureUnit::Celsius.symbol().to_string(),
            TemperatureUnit::Fahrenheit.symbol().to_string(),
        )
    }

    fn default_value(&self) -> &'static str {
        "0"
    }

    fn convert(&self, value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<Conversion> {
        let from: TemperatureUnit = from_unit.parse()?;
        let to: TemperatureUnit = to_unit.parse()?;

        let result = convert_temperature(value, from, to);
        let rate = convert_temperature(REFERENCE_VALUE, from, to);
        let formatted_rate = format_temperature(rate);

        Ok(Conversion {
            result,
            formatted_result: format_temperature(result),
            rate,
            rate_text: format!("{} {} = {} {}", REFERENCE_VALUE, from, formatted_rate, to),
            formatted_rate,
        })
    }
}
