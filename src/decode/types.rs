//! Decoder types
//!
//! Defines decoded rows and decoder configuration.

use std::collections::HashMap;

/// One decoded CSV data row, keyed by header name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value by header name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Set a field value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CsvRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Configuration for CSV decoding
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Trim whitespace around headers and values
    pub trim: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl DecoderConfig {
    /// Create a CSV decoder config with a custom delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Default::default()
        }
    }

    /// Enable or disable whitespace trimming
    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}
