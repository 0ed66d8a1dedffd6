//! Conversion engine
//!
//! `features` holds one converter per widget section, `format` the display
//! rules shared by all of them.

pub mod features;
pub mod format;
