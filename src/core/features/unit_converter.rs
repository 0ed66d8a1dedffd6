use once_cell::sync::Lazy;
use tracing::debug;

use super::{Category, FeatureSync};
use crate::core::format::format_linear;
use crate::shared::error::{ConverterError, ConverterResult};
use crate::shared::types::Conversion;

// ============================================================================
// Unit Tables - one per linear category
// ============================================================================

/// One row of a unit table: "1 `symbol` = `factor` base units".
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFactor {
    pub symbol: String,
    pub factor: f64,
}

/// Ordered unit table for a linear category.
///
/// Exactly one unit has factor 1 (the base unit) and every factor is
/// finite and positive. Row order is the order units are offered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable {
    name: String,
    units: Vec<UnitFactor>,
}

impl UnitTable {
    /// Build a table, checking the base-unit invariant.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        units: impl IntoIterator<Item = (S, f64)>,
    ) -> ConverterResult<Self> {
        let name = name.into();
        let mut rows: Vec<UnitFactor> = Vec::new();

        for (symbol, factor) in units {
            let symbol = symbol.into();
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConverterError::InvalidTable(format!(
                    "{}: factor for '{}' must be positive, got {}",
                    name, symbol, factor
                )));
            }
            if rows.iter().any(|row| row.symbol == symbol) {
                return Err(ConverterError::InvalidTable(format!(
                    "{}: duplicate unit '{}'",
                    name, symbol
                )));
            }
            rows.push(UnitFactor { symbol, factor });
        }

        let base_count = rows.iter().filter(|row| row.factor == 1.0).count();
        if base_count != 1 {
            return Err(ConverterError::InvalidTable(format!(
                "{}: expected exactly one base unit, found {}",
                name, base_count
            )));
        }

        Ok(Self { name, units: rows })
    }

    // Builtin rows are checked by the tests below.
    fn builtin(name: &str, rows: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            units: rows
                .iter()
                .map(|(symbol, factor)| UnitFactor {
                    symbol: symbol.to_string(),
                    factor: *factor,
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_unit(&self) -> Option<&str> {
        self.units
            .iter()
            .find(|row| row.factor == 1.0)
            .map(|row| row.symbol.as_str())
    }

    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|row| row.symbol.as_str())
    }

    pub fn factor(&self, unit: &str) -> ConverterResult<f64> {
        self.units
            .iter()
            .find(|row| row.symbol == unit)
            .map(|row| row.factor)
            .ok_or_else(|| ConverterError::invalid_unit(unit, &self.name))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Length (base: meters)
pub static LENGTH_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::builtin(
        "length",
        &[
            ("mm", 0.001),
            ("cm", 0.01),
            ("m", 1.0),
            ("km", 1000.0),
            ("inch", 0.0254),
            ("foot", 0.3048),
            ("yard", 0.9144),
            ("mile", 1609.34),
        ],
    )
});

/// Weight (base: grams)
pub static WEIGHT_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::builtin(
        "weight",
        &[
            ("mg", 0.001),
            ("g", 1.0),
            ("kg", 1000.0),
            ("tonne", 1_000_000.0),
            ("ounce", 28.3495),
            ("pound", 453.592),
            ("stone", 6350.29),
        ],
    )
});

/// Volume (base: milliliters)
pub static VOLUME_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::builtin(
        "volume",
        &[
            ("ml", 1.0),
            ("l", 1000.0),
            ("m³", 1_000_000.0),
            ("tsp", 4.92892),
            ("tbsp", 14.7868),
            ("fl-oz", 29.5735),
            ("cup", 236.588),
            ("pint", 473.176),
            ("quart", 946.353),
            ("gallon", 3785.41),
        ],
    )
});

/// Speed (base: meters/second)
pub static SPEED_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::builtin(
        "speed",
        &[
            ("m/s", 1.0),
            ("km/h", 1.0 / 3.6),
            ("mph", 0.44704),
            ("ft/s", 0.3048),
            ("knot", 0.514444),
        ],
    )
});

/// Area (base: square meters)
pub static AREA_UNITS: Lazy<UnitTable> = Lazy::new(|| {
    UnitTable::builtin(
        "area",
        &[
            ("mm²", 0.000001),
            ("cm²", 0.0001),
            ("m²", 1.0),
            ("hectare", 10_000.0),
            ("km²", 1_000_000.0),
            ("in²", 0.00064516),
            ("ft²", 0.092903),
            ("yd²", 0.836127),
            ("acre", 4046.86),
            ("mi²", 2_589_988.11),
        ],
    )
});

/// Table backing a linear category, `None` for temperature and currency.
pub fn table_for(category: Category) -> Option<&'static UnitTable> {
    match category {
        Category::Length => Some(&*LENGTH_UNITS),
        Category::Weight => Some(&*WEIGHT_UNITS),
        Category::Volume => Some(&*VOLUME_UNITS),
        Category::Speed => Some(&*SPEED_UNITS),
        Category::Area => Some(&*AREA_UNITS),
        Category::Temperature | Category::Currency => None,
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// `value * table[from] / table[to]`, through the table's base unit.
pub fn convert_linear(value: f64, from_unit: &str, to_unit: &str, table: &UnitTable) -> ConverterResult<f64> {
    let from_factor = table.factor(from_unit)?;
    let to_factor = table.factor(to_unit)?;

    if from_unit == to_unit {
        return Ok(value);
    }

    let base_value = value * from_factor;
    let result = base_value / to_factor;

    debug!(
        category = table.name(),
        "{} {} -> {} {} (base: {})",
        value, from_unit, result, to_unit, base_value
    );

    Ok(result)
}

/// Rate descriptor shown as "1 from = rate to": `table[to] / table[from]`.
///
/// Independent of the entered value.
pub fn linear_rate(from_unit: &str, to_unit: &str, table: &UnitTable) -> ConverterResult<f64> {
    let from_factor = table.factor(from_unit)?;
    let to_factor = table.factor(to_unit)?;
    Ok(to_factor / from_factor)
}

// ============================================================================
// Feature Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct LinearFeature {
    category: Category,
    table: &'static UnitTable,
}

impl LinearFeature {
    pub fn new(category: Category, table: &'static UnitTable) -> Self {
        Self { category, table }
    }

    pub fn table(&self) -> &'static UnitTable {
        self.table
    }
}

impl FeatureSync for LinearFeature {
    fn category(&self) -> Category {
        self.category
    }

    fn units(&self) -> Vec<String> {
        self.table.units().map(str::to_string).collect()
    }

    fn default_units(&self) -> (String, String) {
        if self.category == Category::Length {
            return ("m".to_string(), "foot".to_string());
        }
        let mut units = self.table.units();
        let from = units.next().unwrap_or_default().to_string();
        let to = units.next().unwrap_or(from.as_str()).to_string();
        (from, to)
    }

    fn default_value(&self) -> &'static str {
        "1"
    }

    fn convert(&self, value: f64, from_unit: &str, to_unit: &str) -> ConverterResult<Conversion> {
        let result = convert_linear(value, from_unit, to_unit, self.table)?;
        let rate = linear_rate(from_unit, to_unit, self.table)?;
        let formatted_rate = format_linear(rate);

        Ok(Conversion {
            result,
            formatted_result: format_linear(result),
            rate,
            rate_text: format!("1 {} = {} {}", from_unit, formatted_rate, to_unit),
            formatted_rate,
        })
    }
}
