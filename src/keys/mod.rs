//! Object key parsing
//!
//! Object keys follow the convention `<prefix>/<SYMBOL>/<SYMBOL><TIMESTAMP>.<ext>`,
//! for example `stocks/LYFT/LYFT2025-11-17_15-26-55.csv`.
//!
//! # Overview
//!
//! The keys module provides:
//! - `extract_symbol_timestamp` - Split an object key into symbol and timestamp
//! - `KeyParts` - The parsed key, which also builds the table partition key
//! - `row_key` - The per-row table sort key

use crate::error::{Error, Result};
use serde::Serialize;

/// Symbol and timestamp parsed from an object key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyParts {
    /// Ticker symbol (second path segment)
    pub symbol: String,
    /// Timestamp text taken from the filename, passed through opaquely
    pub timestamp: String,
}

impl KeyParts {
    /// Create key parts directly
    pub fn new(symbol: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Table partition key: `{symbol}_{timestamp}`
    pub fn partition_key(&self) -> String {
        format!("{}_{}", self.symbol, self.timestamp)
    }
}

/// Extract symbol and timestamp from an object key
///
/// The symbol is the second `/` segment. The timestamp is the filename stem
/// (text before the first `.`) with the first occurrence of the symbol
/// removed. The symbol is not required to be a prefix of the stem: if it
/// only appears later, or appears again inside the timestamp, only its first
/// occurrence is dropped.
///
/// # Errors
///
/// Returns [`Error::KeyFormat`] when the key has fewer than two segments.
pub fn extract_symbol_timestamp(key: &str) -> Result<KeyParts> {
    let parts: Vec<&str> = key.split('/').collect();
    if parts.len() < 2 {
        return Err(Error::key_format(key));
    }

    let symbol = parts[1];
    if symbol.is_empty() {
        tracing::debug!(key, "Object key has an empty symbol segment");
    }

    let filename = parts[parts.len() - 1];
    let stem = filename.split('.').next().unwrap_or("");
    let timestamp = stem.replacen(symbol, "", 1);

    Ok(KeyParts::new(symbol, timestamp))
}

/// Table sort key for a row: `{date}_{index}`
pub fn row_key(date: &str, index: usize) -> String {
    format!("{date}_{index}")
}

#[cfg(test)]
mod tests;
