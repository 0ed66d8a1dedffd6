pub mod types;
pub mod settings;
pub mod error;

// Re-export ConverterError for convenience
pub use error::{ConverterError, ConverterResult};
