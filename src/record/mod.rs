//! Row records and numeric coercion
//!
//! # Overview
//!
//! The record module provides:
//! - `to_decimal` - Lenient decimal parsing (zero on failure)
//! - `parse_volume` - Strict integer parsing for the volume column
//! - `BarRecord` - One normalized price bar, ready to upsert into the table

mod coerce;
mod types;

pub use coerce::{parse_volume, to_decimal};
pub use types::{BarRecord, REQUIRED_COLUMNS};
