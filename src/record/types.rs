//! Bar record type

use super::coerce::{parse_volume, to_decimal};
use crate::decode::CsvRow;
use crate::error::{Error, Result};
use crate::keys::{row_key, KeyParts};
use rust_decimal::Decimal;
use serde::Serialize;

/// Columns every price bar file must provide
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "close", "high", "low", "volume"];

/// One normalized price bar as written to the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarRecord {
    /// Partition key: `{symbol}_{timestamp}`
    pub symbol_timestamp: String,
    /// Sort key: `{date}_{row_index}`
    pub row_key: String,
    pub symbol: String,
    pub timestamp: String,
    pub date: String,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: i64,
}

impl BarRecord {
    /// Build a record from a decoded CSV row
    ///
    /// `index` is the zero-based position of the row within its file.
    /// Price columns fall back to zero when unparseable; the volume column
    /// does not.
    pub fn from_row(parts: &KeyParts, index: usize, row: &CsvRow) -> Result<Self> {
        let field = |name: &str| {
            row.get(name)
                .ok_or_else(|| Error::missing_column(name, index))
        };

        let date = field("date")?;
        let open = to_decimal(field("open")?);
        let close = to_decimal(field("close")?);
        let high = to_decimal(field("high")?);
        let low = to_decimal(field("low")?);
        let volume = parse_volume(field("volume")?, index)?;

        Ok(Self {
            symbol_timestamp: parts.partition_key(),
            row_key: row_key(date, index),
            symbol: parts.symbol.clone(),
            timestamp: parts.timestamp.clone(),
            date: date.to_string(),
            open,
            close,
            high,
            low,
            volume,
        })
    }

    /// Composite table key (partition key, sort key)
    pub fn key(&self) -> (&str, &str) {
        (&self.symbol_timestamp, &self.row_key)
    }
}
