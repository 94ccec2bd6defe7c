//! Numeric coercion for CSV field values

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert a field value to a decimal, defaulting to zero when invalid
///
/// The exact parse is tried first, then scientific notation (`1.5e3`), then
/// a rounding parse for values with more digits than `Decimal` can hold.
/// Surrounding whitespace is ignored. This never fails.
///
/// Values whose exponent needs a scale above 28, such as `1e-30`, cannot be
/// represented and also fall back to zero.
pub fn to_decimal(value: &str) -> Decimal {
    let value = value.trim();

    Decimal::from_str_exact(value)
        .or_else(|_| Decimal::from_scientific(value))
        .or_else(|_| Decimal::from_str(value))
        .unwrap_or(Decimal::ZERO)
}

/// Parse the volume field as a plain integer
///
/// # Errors
///
/// Returns [`Error::RowCoercion`] when the value is not an integer. No
/// default is substituted.
pub fn parse_volume(value: &str, row: usize) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::coercion("volume", value, row))
}
