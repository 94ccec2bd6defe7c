//! CSV decoder module
//!
//! # Overview
//!
//! Price bar files are header-delimited CSV: the first line names the
//! fields and every following line holds one bar. The decoder turns the
//! whole text body into ordered rows of field name → string value.
//! Numeric coercion happens later, in the `record` module.

mod decoders;
mod types;

pub use decoders::CsvDecoder;
pub use types::{CsvRow, DecoderConfig};
