//! Per-section input state
//!
//! Mirrors the two value fields and two unit selectors of a section so the
//! host only has to copy strings in and out.

use serde::{Deserialize, Serialize};

use super::{Category, UnitConverter};
use crate::core::format::coerce_input;
use crate::shared::error::ConverterResult;
use crate::shared::types::SectionView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterForm {
    pub category: Category,
    pub from_value: String,
    pub from_unit: String,
    pub to_value: String,
    pub to_unit: String,
    pub rate_text: String,
}

impl ConverterForm {
    /// Form in its initial state for a loaded section. Call `recompute` to fill the result.
    pub fn from_section(view: &SectionView) -> Self {
        Self {
            category: view.category,
            from_value: view.default_value.clone(),
            from_unit: view.from_unit.clone(),
            to_value: String::new(),
            to_unit: view.to_unit.clone(),
            rate_text: String::new(),
        }
    }

    /// Re-run the conversion from the current inputs.
    ///
    /// Unparseable input converts as 0.
    pub fn recompute(&mut self, converter: &UnitConverter) -> ConverterResult<()> {
        let value = coerce_input(&self.from_value);
        let conversion = converter.convert(self.category, value, &self.from_unit, &self.to_unit)?;
        self.to_value = conversion.formatted_result;
        self.rate_text = conversion.rate_text;
        Ok(())
    }

    /// Exchange units and values, then refresh once.
    pub fn swap(&mut self, converter: &UnitConverter) -> ConverterResult<()> {
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        std::mem::swap(&mut self.from_value, &mut self.to_value);
        self.recompute(converter)
    }
}
