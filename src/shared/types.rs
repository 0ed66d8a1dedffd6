use serde::{Deserialize, Serialize};

use crate::core::features::currency::types::RateStatus;
use crate::core::features::Category;

/// Result of one conversion pass, ready for display.
///
/// `formatted_result` and `formatted_rate` already follow the category's
/// formatting rule; `rate_text` is the full "1 m = 0.3048 foot" line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub result: f64,
    pub formatted_result: String,
    pub rate: f64,
    pub formatted_rate: String,
    pub rate_text: String,
}

// Unit entry for selector population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDTO {
    pub id: String,
    pub category: String,
}

/// Everything a host needs to render a freshly activated section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub units: Vec<UnitDTO>,
    pub from_unit: String,
    pub to_unit: String,
    pub default_value: String,
    /// Only set for the currency section
    pub status: Option<RateStatus>,
}
