//! Error handling with ConverterError enum
//!
//! All errors are serializable so a host UI can receive them over IPC.
//! Only unit lookups surface as errors to callers; network failures are
//! recovered by the currency service and only show up in `FetchOutcome`.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum ConverterError {
    /// Unit key not present in the category's table
    #[error("Unknown {category} unit: {unit}")]
    InvalidUnit { unit: String, category: String },

    #[error("Unknown converter category: {0}")]
    UnknownCategory(String),

    /// A unit table that breaks the base-unit invariant
    #[error("Invalid unit table: {0}")]
    InvalidTable(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Rate payload that could not be decoded or held no usable rates
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ConverterError {
    pub fn invalid_unit(unit: impl Into<String>, category: impl Into<String>) -> Self {
        ConverterError::InvalidUnit {
            unit: unit.into(),
            category: category.into(),
        }
    }
}

impl From<reqwest::Error> for ConverterError {
    fn from(err: reqwest::Error) -> Self {
        ConverterError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(err: serde_json::Error) -> Self {
        ConverterError::Malformed(format!("JSON error: {}", err))
    }
}

pub type ConverterResult<T> = Result<T, ConverterError>;
